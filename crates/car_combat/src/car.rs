use bevy::math::Vec3;
use bevy::prelude::Component;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::controls::{DriveControls, SpecialsController, WeaponsController};
use crate::damage::{DamageEffect, DamageModel, LifeState};
use crate::definition::VehicleDefinition;
use crate::engine::{engine_pitch, engine_sounds, EngineSounds, EngineState};
use crate::panel::SystemsPanel;
use crate::systems::SystemType;
use crate::zone::DamageType;

/// Child parts knocked off the chassis when the car blows up.
pub const DETACHED_PARTS: [&str; 4] = ["FrontLeft", "FrontRight", "BackLeft", "BackRight"];
pub const EXPLOSION_SOUND: &str = "xcar";
pub const EXPLOSION_VOLUME: f32 = 0.9;
const EXPLOSION_IMPULSE_PER_MASS: f32 = 5.0;

/// What the destruction sequence needs to stage the wreck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplosionReport {
    pub impulse: [f32; 3],
    pub sound: &'static str,
    pub volume: f32,
    pub detached_parts: [&'static str; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageOutcome {
    pub target: SystemType,
    pub effects: Vec<DamageEffect>,
}

impl DamageOutcome {
    pub fn destroyed(&self) -> bool {
        self.effects.contains(&DamageEffect::Destroyed)
    }
}

/// A combat vehicle. Controllers exist only while it is alive and are
/// dropped when it explodes.
#[derive(Component, Debug)]
pub struct Car {
    name: String,
    vehicle_size: u8,
    mass: f32,
    damage: DamageModel,
    engine: EngineState,
    controls: DriveControls,
    weapons: Option<WeaponsController>,
    specials: Option<SpecialsController>,
    systems_panel: Option<SystemsPanel>,
    explosion: Option<ExplosionReport>,
    sitting: bool,
    pub is_player: bool,
    pub team_id: u32,
}

impl Car {
    pub fn configure(definition: &VehicleDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            vehicle_size: definition.vehicle_size,
            mass: definition.mass,
            damage: DamageModel::new(definition),
            engine: EngineState::default(),
            controls: DriveControls::default(),
            weapons: Some(WeaponsController::new(definition.weapons)),
            specials: Some(SpecialsController::new(definition.specials)),
            systems_panel: Some(SystemsPanel::default()),
            explosion: None,
            sitting: false,
            is_player: false,
            team_id: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_alive(&self) -> bool {
        self.damage.is_alive()
    }

    pub fn state(&self) -> LifeState {
        self.damage.state()
    }

    pub fn damage_model(&self) -> &DamageModel {
        &self.damage
    }

    pub fn health(&self, system: SystemType) -> i32 {
        self.damage.health(system)
    }

    pub fn health_group(&self, system: SystemType) -> usize {
        self.damage.health_group(system)
    }

    pub fn apply_damage<R: Rng + ?Sized>(
        &mut self,
        damage_type: DamageType,
        normal: Vec3,
        amount: u32,
        rng: &mut R,
    ) -> DamageOutcome {
        let mut effects = Vec::new();
        let target = self
            .damage
            .apply_damage(damage_type, normal, amount, rng, &mut effects);
        self.dispatch(&effects);
        DamageOutcome { target, effects }
    }

    pub fn kill(&mut self) -> Vec<DamageEffect> {
        let mut effects = Vec::new();
        self.damage.kill(&mut effects);
        self.dispatch(&effects);
        effects
    }

    fn dispatch(&mut self, effects: &[DamageEffect]) {
        for effect in effects {
            match *effect {
                DamageEffect::SystemHealthGroup {
                    system,
                    tier,
                    dirty,
                } => {
                    if let Some(panel) = self.systems_panel.as_mut() {
                        panel.set_system_health_group(system, tier, dirty);
                    }
                }
                DamageEffect::VehicleHealthGroup { .. } => {}
                DamageEffect::Destroyed => self.explode(),
            }
        }
    }

    fn explode(&mut self) {
        if self.explosion.is_some() {
            return;
        }
        self.engine.shut_down();
        self.controls = DriveControls::default();
        self.weapons = None;
        self.specials = None;
        self.systems_panel = None;
        self.sitting = false;
        let report = ExplosionReport {
            impulse: [0.0, self.mass * EXPLOSION_IMPULSE_PER_MASS, 0.0],
            sound: EXPLOSION_SOUND,
            volume: EXPLOSION_VOLUME,
            detached_parts: DETACHED_PARTS,
        };
        info!(target: "car_combat.car", name = %self.name, "car exploded");
        self.explosion = Some(report);
    }

    pub fn explosion(&self) -> Option<&ExplosionReport> {
        self.explosion.as_ref()
    }

    pub fn drive(&mut self, throttle_axis: f32, steer_axis: f32, ebrake: bool) {
        if !self.is_alive() {
            return;
        }
        self.sitting = false;
        self.controls =
            DriveControls::from_axes(throttle_axis, steer_axis, ebrake, self.engine.running());
    }

    /// Parks the car: full brake until the next drive input.
    pub fn sit(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.sitting = true;
        self.controls = DriveControls::full_brake();
    }

    pub fn is_sitting(&self) -> bool {
        self.sitting
    }

    pub fn controls(&self) -> DriveControls {
        self.controls
    }

    pub fn engine(&self) -> &EngineState {
        &self.engine
    }

    pub fn toggle_engine(&mut self) {
        if self.is_alive() {
            self.engine.toggle();
        }
    }

    pub fn tick_engine(&mut self, dt: f32, start_clip_len: f32) -> bool {
        self.is_alive() && self.engine.tick(dt, start_clip_len)
    }

    pub fn engine_pitch(&self, speed: f32) -> Option<f32> {
        self.engine.running().then(|| engine_pitch(speed))
    }

    pub fn engine_sounds(&self) -> Option<EngineSounds> {
        engine_sounds(self.vehicle_size, self.damage.visual_tier())
    }

    pub fn weapons(&self) -> Option<&WeaponsController> {
        self.weapons.as_ref()
    }

    pub fn weapons_mut(&mut self) -> Option<&mut WeaponsController> {
        self.weapons.as_mut()
    }

    pub fn specials_mut(&mut self) -> Option<&mut SpecialsController> {
        self.specials.as_mut()
    }

    pub fn systems_panel(&self) -> Option<&SystemsPanel> {
        self.systems_panel.as_ref()
    }

    pub fn systems_panel_mut(&mut self) -> Option<&mut SystemsPanel> {
        self.systems_panel.as_mut()
    }
}
