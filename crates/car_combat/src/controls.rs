use serde::Serialize;

/// Resolved pedal and steering state handed to the car physics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DriveControls {
    pub throttle: f32,
    pub brake: f32,
    pub steer: f32,
    pub ebrake: bool,
}

impl DriveControls {
    /// Splits a signed throttle axis into throttle and brake. A stalled
    /// engine cannot accelerate but can still brake and steer.
    pub fn from_axes(
        throttle_axis: f32,
        steer_axis: f32,
        ebrake: bool,
        engine_running: bool,
    ) -> Self {
        let throttle_axis = throttle_axis.clamp(-1.0, 1.0);
        let steer = steer_axis.clamp(-1.0, 1.0);
        let throttle = if engine_running {
            throttle_axis.max(0.0)
        } else {
            0.0
        };
        Self {
            throttle,
            brake: -throttle_axis.min(0.0),
            steer,
            ebrake,
        }
    }

    pub fn full_brake() -> Self {
        Self {
            brake: 1.0,
            ..Default::default()
        }
    }
}

/// Fires the hardpoints mounted on a car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponsController {
    weapon_count: usize,
    selected: usize,
    firing: Vec<bool>,
}

impl WeaponsController {
    pub fn new(weapon_count: usize) -> Self {
        Self {
            weapon_count,
            selected: 0,
            firing: vec![false; weapon_count],
        }
    }

    /// `None` fires every weapon at once.
    pub fn fire(&mut self, index: Option<usize>) {
        match index {
            None => self.firing.iter_mut().for_each(|f| *f = true),
            Some(idx) => {
                if let Some(slot) = self.firing.get_mut(idx) {
                    *slot = true;
                }
            }
        }
    }

    pub fn stop_firing(&mut self) {
        self.firing.iter_mut().for_each(|f| *f = false);
    }

    pub fn cycle_weapon(&mut self) {
        if self.weapon_count > 0 {
            self.selected = (self.selected + 1) % self.weapon_count;
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_firing(&self) -> bool {
        self.firing.iter().any(|f| *f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialsController {
    triggered: Vec<bool>,
}

impl SpecialsController {
    pub fn new(slots: usize) -> Self {
        Self {
            triggered: vec![false; slots],
        }
    }

    pub fn fire(&mut self, slot: usize) {
        if let Some(trigger) = self.triggered.get_mut(slot) {
            *trigger = true;
        }
    }

    pub fn take_triggered(&mut self) -> Vec<usize> {
        let fired = self
            .triggered
            .iter()
            .enumerate()
            .filter_map(|(idx, fired)| fired.then_some(idx))
            .collect();
        self.triggered.iter_mut().for_each(|t| *t = false);
        fired
    }
}
