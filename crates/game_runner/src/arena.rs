use bevy::prelude::*;
use car_combat::gameplay::{
    spawn_car, DetachablePart, HealthGroupPart, HitEvent, PlayerControlled, SimulationRng,
    Velocity, Wrecked,
};
use car_combat::zone::normal_from_angle;
use car_combat::{Car, DamageType, VehicleDefinition};
use std::fs;
use std::path::PathBuf;

const DEFAULT_HIT_INTERVAL: f32 = 0.6;
const DEFAULT_HIT_AMOUNT: u32 = 40;
const ACCELERATION: f32 = 220.0;
const BRAKE_DECELERATION: f32 = 400.0;
const DRAG: f32 = 0.8;
const TURN_RATE: f32 = 2.4;
const BODY_SIZE: Vec2 = Vec2::new(48.0, 80.0);

pub const DEFAULT_VEHICLE_DIR: &str = "assets/vehicles";

/// Proving ground populated from the definitions found under `root`.
pub struct ArenaPlugin {
    root: PathBuf,
}

impl ArenaPlugin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        let settings = ArenaSettings::from_env();
        let roster = VehicleRoster::discover(self.root.clone(), settings.vehicle.clone());
        app.insert_resource(ArenaClock(Timer::from_seconds(
            settings.hit_interval,
            TimerMode::Repeating,
        )))
        .insert_resource(settings)
        .insert_resource(roster)
        .add_systems(Startup, (log_roster, spawn_arena))
        .add_systems(FixedUpdate, (bombard_cars, drive_cars))
        .add_systems(Update, decorate_parts);
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ArenaSettings {
    /// Definition file for the player car, overriding the roster's first entry.
    pub vehicle: Option<PathBuf>,
    pub hit_interval: f32,
    pub hit_amount: u32,
}

impl ArenaSettings {
    pub fn from_env() -> Self {
        let vehicle = std::env::var("VEHICLE_DEFINITION").ok().map(PathBuf::from);
        let hit_interval = std::env::var("ARENA_HIT_INTERVAL")
            .ok()
            .and_then(|val| val.parse().ok())
            .filter(|secs: &f32| *secs > 0.0)
            .unwrap_or(DEFAULT_HIT_INTERVAL);
        let hit_amount = std::env::var("ARENA_HIT_AMOUNT")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_HIT_AMOUNT);
        Self {
            vehicle,
            hit_interval,
            hit_amount,
        }
    }
}

#[derive(Resource)]
struct ArenaClock(Timer);

#[derive(Resource, Debug)]
pub struct VehicleRoster {
    pub root: PathBuf,
    pub available: Vec<PathBuf>,
    pub player: Option<PathBuf>,
}

impl VehicleRoster {
    fn discover(root: PathBuf, requested: Option<PathBuf>) -> Self {
        let mut available = Vec::new();
        if let Ok(entries) = fs::read_dir(&root) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
                    available.push(path);
                }
            }
        }
        available.sort();
        let player = requested.or_else(|| available.first().cloned());
        Self {
            root,
            available,
            player,
        }
    }

    /// Falls back to the built-in definition when the file is missing or broken.
    fn load(path: Option<&PathBuf>) -> VehicleDefinition {
        let Some(path) = path else {
            return VehicleDefinition::default();
        };
        match VehicleDefinition::from_path(path) {
            Ok(definition) => definition,
            Err(err) => {
                warn!(
                    target: "arena",
                    path = %path.display(),
                    error = %err,
                    "using default vehicle"
                );
                VehicleDefinition::default()
            }
        }
    }
}

fn log_roster(roster: Res<VehicleRoster>) {
    if roster.available.is_empty() {
        info!(
            target: "arena",
            "No vehicle definitions under {}. Add <name>.toml to race something else",
            roster.root.display()
        );
        return;
    }
    info!(
        target: "arena",
        "Vehicles: {:?} (player: {})",
        roster.available,
        roster
            .player
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "default".into()),
    );
}

fn spawn_arena(mut commands: Commands, roster: Res<VehicleRoster>) {
    commands.spawn(Camera2d);

    let player = VehicleRoster::load(roster.player.as_ref());
    spawn_car(
        &mut commands,
        &player,
        Transform::from_xyz(-120.0, 0.0, 0.0),
        true,
    );

    let rival_path = roster
        .available
        .iter()
        .find(|path| Some(*path) != roster.player.as_ref());
    let rival = VehicleRoster::load(rival_path.or(roster.player.as_ref()));
    spawn_car(
        &mut commands,
        &rival,
        Transform::from_xyz(120.0, 0.0, 0.0),
        false,
    );
}

/// Gives the tier variants and wheels something to draw.
fn decorate_parts(
    mut commands: Commands,
    tiers: Query<(Entity, &HealthGroupPart), Added<HealthGroupPart>>,
    wheels: Query<(Entity, &Name), Added<DetachablePart>>,
) {
    for (entity, part) in &tiers {
        let shade = 1.0 - part.tier as f32 * 0.2;
        commands.entity(entity).insert(Sprite {
            color: Color::srgb(0.9 * shade, 0.35 * shade, 0.2 * shade),
            custom_size: Some(BODY_SIZE),
            ..default()
        });
    }
    for (entity, name) in &wheels {
        let x = if name.as_str().ends_with("Left") { -1.0 } else { 1.0 };
        let y = if name.as_str().starts_with("Front") { 1.0 } else { -1.0 };
        commands.entity(entity).insert((
            Sprite {
                color: Color::srgb(0.1, 0.1, 0.12),
                custom_size: Some(Vec2::new(12.0, 20.0)),
                ..default()
            },
            Transform::from_xyz(x * BODY_SIZE.x * 0.55, y * BODY_SIZE.y * 0.35, 0.1),
        ));
    }
}

/// Periodic hits from a random direction against a random live car.
fn bombard_cars(
    time: Res<Time>,
    settings: Res<ArenaSettings>,
    mut clock: ResMut<ArenaClock>,
    mut rng: ResMut<SimulationRng>,
    cars: Query<Entity, (With<Car>, Without<Wrecked>)>,
    mut hits: EventWriter<HitEvent>,
) {
    if !clock.0.tick(time.delta()).just_finished() {
        return;
    }
    let targets: Vec<Entity> = cars.iter().collect();
    if targets.is_empty() {
        return;
    }
    let pick = rng.gen_range(0..=(targets.len() as u32 - 1)) as usize;
    let damage_type = if rng.gen_range(0..=1) == 0 {
        DamageType::Projectile
    } else {
        DamageType::Force
    };
    let angle = rng.gen_f32(0.0..=359.9);
    hits.send(HitEvent {
        target: targets[pick],
        damage_type,
        normal: normal_from_angle(angle),
        amount: settings.hit_amount,
    });
}

/// Kinematic stand-in for wheel physics. Only the player car moves.
fn drive_cars(
    time: Res<Time>,
    mut cars: Query<(&Car, &mut Velocity, &mut Transform), With<PlayerControlled>>,
) {
    let dt = time.delta_secs();
    for (car, mut velocity, mut transform) in cars.iter_mut() {
        let controls = car.controls();
        let forward = (transform.rotation * Vec3::Y).normalize_or_zero();
        let mut speed = velocity.0.dot(forward);
        speed += controls.throttle * ACCELERATION * dt;
        speed = apply_brake(speed, controls.brake, dt);
        if controls.ebrake {
            speed = 0.0;
        }
        speed *= 1.0 - (DRAG * dt).min(1.0);

        let yaw = -controls.steer * TURN_RATE * dt * (speed / ACCELERATION).clamp(-1.0, 1.0);
        transform.rotate_z(yaw);
        let forward = (transform.rotation * Vec3::Y).normalize_or_zero();
        velocity.0 = forward * speed;
        transform.translation += velocity.0 * dt;
    }
}

/// Braking pulls speed toward zero without crossing it.
fn apply_brake(speed: f32, brake: f32, dt: f32) -> f32 {
    let decel = brake * BRAKE_DECELERATION * dt;
    (speed.abs() - decel).max(0.0).copysign(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_prefers_requested_vehicle() {
        let roster = VehicleRoster::discover(
            PathBuf::from("does/not/exist"),
            Some(PathBuf::from("custom.toml")),
        );
        assert!(roster.available.is_empty());
        assert_eq!(Some(PathBuf::from("custom.toml")), roster.player);
    }

    #[test]
    fn missing_definition_falls_back_to_default() {
        let def = VehicleRoster::load(Some(&PathBuf::from("does/not/exist.toml")));
        assert_eq!(VehicleDefinition::default(), def);
    }

    #[test]
    fn braking_at_rest_stays_put() {
        let dt = 1.0 / 60.0;
        assert_eq!(0.0, apply_brake(0.0, 1.0, dt));
        assert_eq!(0.0, apply_brake(2.0, 1.0, dt));
        assert_eq!(0.0, apply_brake(-2.0, 1.0, dt));
        let slowed = apply_brake(100.0, 0.5, dt);
        assert!(slowed > 0.0 && slowed < 100.0);
        assert_eq!(-slowed, apply_brake(-100.0, 0.5, dt));
    }
}
