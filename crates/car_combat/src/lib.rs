//! Vehicle combat core: zone damage, overflow routing into core systems,
//! visual damage tiers, plus the Bevy plugins that drive them.

use bevy::prelude::*;

pub mod camera;
pub mod car;
pub mod context;
pub mod controls;
pub mod damage;
pub mod definition;
pub mod diagnostics;
pub mod engine;
pub mod gameplay;
pub mod health;
pub mod panel;
pub mod systems;
pub mod ui;
pub mod zone;

pub use car::{Car, DamageOutcome, ExplosionReport};
pub use damage::{DamageEffect, DamageModel, LifeState};
pub use definition::{DefinitionError, VehicleDefinition, ZoneValues};
pub use health::{health_group, HealthTable};
pub use systems::{SystemType, CORE_SYSTEMS};
pub use zone::{DamageType, Quadrant};

pub use bevy::math::Vec3;

/// Headless gameplay. Windowed builds add [`ui::UiPlugin`] and
/// [`diagnostics::DiagnosticsPlugin`] on top.
pub struct CarCombatPlugin;

impl Plugin for CarCombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(gameplay::GameplayPlugin);
    }
}
