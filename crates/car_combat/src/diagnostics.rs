use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::prelude::*;

use crate::gameplay::VehicleDestroyed;

pub struct DiagnosticsPlugin;

impl Plugin for DiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(LogDiagnosticsPlugin::default())
            .add_systems(Update, log_destroyed_vehicles);
    }
}

fn log_destroyed_vehicles(mut destroyed: EventReader<VehicleDestroyed>) {
    for event in destroyed.read() {
        info!(
            target: "car_combat.diagnostics",
            entity = ?event.entity,
            name = %event.name,
            "vehicle destroyed"
        );
    }
}
