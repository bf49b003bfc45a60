use bevy::input::keyboard::KeyCode;
use bevy::prelude::Resource;
use tracing::debug;

/// Which chassis model the player sees from the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChassisView {
    FirstPerson,
    ThirdPerson,
    AllHidden,
}

impl ChassisView {
    /// Wheels are only drawn alongside the third-person body.
    pub fn shows_wheels(self) -> bool {
        self == ChassisView::ThirdPerson
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraView {
    Cockpit,
    Chase,
    Hood,
    /// Camera mounted on wheel 0..=3 (FL, FR, BL, BR).
    Wheel(u8),
}

impl CameraView {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::F1 => Some(CameraView::Cockpit),
            KeyCode::F2 => Some(CameraView::Chase),
            KeyCode::F3 => Some(CameraView::Hood),
            KeyCode::F4 => Some(CameraView::Wheel(0)),
            KeyCode::F5 => Some(CameraView::Wheel(1)),
            KeyCode::F6 => Some(CameraView::Wheel(2)),
            KeyCode::F7 => Some(CameraView::Wheel(3)),
            _ => None,
        }
    }

    pub fn chassis(self) -> ChassisView {
        match self {
            CameraView::Cockpit => ChassisView::FirstPerson,
            CameraView::Hood => ChassisView::AllHidden,
            CameraView::Chase | CameraView::Wheel(_) => ChassisView::ThirdPerson,
        }
    }
}

pub const VIEW_KEYS: [KeyCode; 7] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
];

/// View mode of the main camera following the player car.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRig {
    view: CameraView,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            view: CameraView::Chase,
        }
    }
}

impl CameraRig {
    pub fn view(&self) -> CameraView {
        self.view
    }

    pub fn chassis(&self) -> ChassisView {
        self.view.chassis()
    }

    pub fn select(&mut self, view: CameraView) {
        if self.view != view {
            debug!(target: "car_combat.camera", ?view, "camera view changed");
            self.view = view;
        }
    }

    /// A wreck is only shown from outside, where the damage tiers are visible.
    pub fn on_player_destroyed(&mut self) {
        self.select(CameraView::Chase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_keys_map_to_views() {
        assert_eq!(Some(CameraView::Cockpit), CameraView::from_key(KeyCode::F1));
        assert_eq!(Some(CameraView::Hood), CameraView::from_key(KeyCode::F3));
        assert_eq!(Some(CameraView::Wheel(3)), CameraView::from_key(KeyCode::F7));
        assert_eq!(None, CameraView::from_key(KeyCode::F8));
    }

    #[test]
    fn chassis_model_per_view() {
        assert_eq!(ChassisView::FirstPerson, CameraView::Cockpit.chassis());
        assert_eq!(ChassisView::AllHidden, CameraView::Hood.chassis());
        assert_eq!(ChassisView::ThirdPerson, CameraView::Wheel(1).chassis());
        assert!(!ChassisView::AllHidden.shows_wheels());
        assert!(CameraView::Chase.chassis().shows_wheels());
    }

    #[test]
    fn destruction_returns_to_chase() {
        let mut rig = CameraRig::default();
        rig.select(CameraView::Cockpit);
        assert_eq!(ChassisView::FirstPerson, rig.chassis());
        rig.on_player_destroyed();
        assert_eq!(CameraView::Chase, rig.view());
    }
}
