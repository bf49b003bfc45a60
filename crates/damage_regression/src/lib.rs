//! Helpers for deterministic regression tests.

use car_combat::health::{group_count, health_group};
use car_combat::zone::normal_from_angle;
use car_combat::{Car, DamageType, SystemType, VehicleDefinition};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

pub const DEFAULT_SEED: u64 = 42;

/// `(damage type, impact angle in degrees, amount)`
pub type Shot = (DamageType, f32, u32);

/// Front-heavy barrage that overflows the front zones into the core systems.
pub const OVERFLOW_BARRAGE: [Shot; 6] = [
    (DamageType::Force, 10.0, 160),
    (DamageType::Force, 350.0, 120),
    (DamageType::Projectile, 20.0, 200),
    (DamageType::Projectile, 340.0, 90),
    (DamageType::Force, 0.0, 75),
    (DamageType::Projectile, 5.0, 60),
];

pub fn fire_barrage(definition: &VehicleDefinition, shots: &[Shot], seed: u64) -> Car {
    let mut car = Car::configure(definition);
    let mut rng = StdRng::seed_from_u64(seed);
    for &(damage_type, angle, amount) in shots {
        car.apply_damage(damage_type, normal_from_angle(angle), amount, &mut rng);
    }
    car
}

pub fn health_snapshot(car: &Car) -> Vec<i32> {
    SystemType::ALL.iter().map(|&s| car.health(s)).collect()
}

/// Tier reported for each sampled vehicle health value.
pub fn tier_ladder(definition: &VehicleDefinition, samples: &[i32]) -> serde_json::Value {
    let start = definition.start_hit_points()[SystemType::Vehicle.index()];
    let groups = group_count(SystemType::Vehicle, definition.health_groups);
    let rows: Vec<_> = samples
        .iter()
        .map(|&current| json!({ "health": current, "tier": health_group(current, start, groups) }))
        .collect();
    json!({ "vehicle": definition.name, "start": start, "ladder": rows })
}

/// Zone each angle resolves to, per damage type.
pub fn zone_table(angles: &[u16]) -> serde_json::Value {
    let rows: Vec<_> = angles
        .iter()
        .map(|&angle| {
            let normal = normal_from_angle(f32::from(angle));
            json!({
                "angle": angle,
                "projectile": car_combat::zone::resolve(normal, DamageType::Projectile),
                "force": car_combat::zone::resolve(normal, DamageType::Force),
            })
        })
        .collect();
    json!(rows)
}
