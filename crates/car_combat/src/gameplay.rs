use bevy::input::keyboard::KeyCode;
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::time::{Fixed, Time};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ops::RangeInclusive;

use crate::camera::{CameraRig, CameraView, ChassisView, VIEW_KEYS};
use crate::car::Car;
use crate::context::CameraStack;
use crate::damage::DamageEffect;
use crate::definition::VehicleDefinition;
use crate::engine::{EngineSounds, DEFAULT_START_CLIP_SECONDS};
use crate::systems::SystemType;
use crate::zone::DamageType;

const DEFAULT_SEED: u64 = 42;
const DEFAULT_FIXED_DELTA: f64 = 1.0 / 30.0;
const EXPLOSION_LIFETIME: f32 = 2.0;
const AI_WEAPON_SLOT: usize = 0;

/// Damage, destruction and driver input for every [`Car`] in the world.
/// Runs headless; rendering and the HUD live in separate plugins.
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SimulationParams>() {
            app.insert_resource(SimulationParams::from_env());
        }
        if app.world().get_resource::<ButtonInput<KeyCode>>().is_none() {
            app.world_mut()
                .insert_resource(ButtonInput::<KeyCode>::default());
        }

        app.init_resource::<SimulationRng>()
            .init_resource::<CameraStack>()
            .init_resource::<CameraRig>()
            .init_resource::<AiFireOrder>()
            .add_event::<HitEvent>()
            .add_event::<KillEvent>()
            .add_event::<VehicleDestroyed>()
            .add_event::<SpecialFired>()
            .add_systems(Startup, configure_fixed_time)
            .add_systems(
                FixedUpdate,
                (
                    apply_damage_events,
                    tick_engines.after(apply_damage_events),
                    fire_ai_weapons.after(apply_damage_events),
                    release_specials.after(apply_damage_events),
                ),
            )
            .add_systems(
                Update,
                (
                    handle_camera_keys,
                    handle_player_input.after(handle_camera_keys),
                    fall_back_to_chase.after(handle_player_input),
                    show_chassis_for_view.after(fall_back_to_chase),
                    update_engine_audio.after(handle_player_input),
                    fade_explosions,
                ),
            )
            .add_systems(Last, tear_down_cameras);
    }
}

#[derive(Resource, Clone, Debug)]
pub struct SimulationParams {
    pub seed: u64,
    pub fixed_delta: f64,
}

impl SimulationParams {
    pub fn from_env() -> Self {
        let seed = std::env::var("SIMULATION_SEED")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let fixed_delta = std::env::var("SIMULATION_FIXED_DT")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_FIXED_DELTA);
        Self { seed, fixed_delta }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            fixed_delta: DEFAULT_FIXED_DELTA,
        }
    }
}

/// Seeded randomness shared by every simulation system, so overflow routing
/// replays identically for a given seed.
#[derive(Resource, Debug)]
pub struct SimulationRng {
    seed: u64,
    rng: StdRng,
}

impl SimulationRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn gen_range(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.gen_range(range)
    }

    pub fn gen_f32(&mut self, range: RangeInclusive<f32>) -> f32 {
        self.rng.gen_range(range)
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl FromWorld for SimulationRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world
            .get_resource::<SimulationParams>()
            .cloned()
            .unwrap_or_default()
            .seed;
        Self::new(seed)
    }
}

/// Whether computer-driven cars keep their primary weapon firing.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct AiFireOrder(pub bool);

#[derive(Event, Debug, Clone, Copy)]
pub struct HitEvent {
    pub target: Entity,
    pub damage_type: DamageType,
    pub normal: Vec3,
    pub amount: u32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct KillEvent {
    pub target: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct VehicleDestroyed {
    pub entity: Entity,
    pub name: String,
}

/// A special slot was triggered during the last fixed step.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialFired {
    pub entity: Entity,
    pub slot: usize,
}

/// Marks the car driven from the keyboard. Removed when the car is wrecked.
#[derive(Component, Debug, Default)]
pub struct PlayerControlled;

#[derive(Component, Debug)]
pub struct Wrecked;

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Velocity(pub Vec3);

/// One third-person model variant shown for a vehicle damage tier.
#[derive(Component, Debug, Clone, Copy)]
pub struct HealthGroupPart {
    pub tier: usize,
}

/// A wheel or other part thrown off on destruction.
#[derive(Component, Debug, Clone, Copy)]
pub struct DetachablePart;

/// Tier variants resolved once at spawn, indexed by tier.
#[derive(Component, Debug, Default)]
pub struct DamageVisuals {
    pub groups: Vec<Vec<Entity>>,
}

#[derive(Component, Debug, Default)]
pub struct DetachableParts(pub Vec<Entity>);

/// Parent of either the exterior body (holding the tier variants) or the
/// cockpit interior.
#[derive(Component, Debug, Clone, Copy)]
pub struct ChassisModel {
    pub view: ChassisView,
}

#[derive(Component, Debug)]
pub struct ChassisModels {
    pub third_person: Entity,
    pub first_person: Entity,
}

#[derive(Component, Debug, Default)]
pub struct EngineAudio {
    pub pitch: f32,
    pub sounds: Option<EngineSounds>,
    /// False while an overlay camera holds the listener or audio is muted.
    pub audible: bool,
}

#[derive(Component, Debug)]
pub struct ExplosionFx {
    pub sound: &'static str,
    pub volume: f32,
    pub timer: Timer,
}

/// Spawns a configured car with its chassis models, tier variants and wheels
/// as children, caching the child handles on the car.
pub fn spawn_car(
    commands: &mut Commands,
    definition: &VehicleDefinition,
    transform: Transform,
    is_player: bool,
) -> Entity {
    let mut car = Car::configure(definition);
    car.is_player = is_player;
    let sounds = car.engine_sounds();

    let mut groups = Vec::with_capacity(definition.health_groups);
    let mut wheels = Vec::with_capacity(crate::car::DETACHED_PARTS.len());
    let mut third_person = Entity::PLACEHOLDER;
    let mut first_person = Entity::PLACEHOLDER;
    let entity = commands
        .spawn((
            Name::new(definition.name.clone()),
            transform,
            Visibility::default(),
            car,
            Velocity::default(),
            EngineAudio {
                pitch: 0.0,
                sounds,
                audible: true,
            },
        ))
        .with_children(|parent| {
            third_person = parent
                .spawn((
                    Name::new("ThirdPerson"),
                    Transform::default(),
                    Visibility::Inherited,
                    ChassisModel {
                        view: ChassisView::ThirdPerson,
                    },
                ))
                .with_children(|body| {
                    for tier in 0..definition.health_groups {
                        let visibility = if tier == 0 {
                            Visibility::Inherited
                        } else {
                            Visibility::Hidden
                        };
                        let part = body
                            .spawn((
                                Name::new(format!("Health {tier}")),
                                Transform::default(),
                                visibility,
                                HealthGroupPart { tier },
                            ))
                            .id();
                        groups.push(vec![part]);
                    }
                })
                .id();
            first_person = parent
                .spawn((
                    Name::new("FirstPerson"),
                    Transform::default(),
                    Visibility::Hidden,
                    ChassisModel {
                        view: ChassisView::FirstPerson,
                    },
                ))
                .id();
            for part_name in crate::car::DETACHED_PARTS {
                let wheel = parent
                    .spawn((
                        Name::new(part_name),
                        Transform::default(),
                        Visibility::Inherited,
                        DetachablePart,
                    ))
                    .id();
                wheels.push(wheel);
            }
        })
        .id();

    commands.entity(entity).insert((
        DamageVisuals { groups },
        DetachableParts(wheels),
        ChassisModels {
            third_person,
            first_person,
        },
    ));
    if is_player {
        commands.entity(entity).insert(PlayerControlled);
    }
    entity
}

#[allow(clippy::type_complexity)]
fn apply_damage_events(
    mut hits: EventReader<HitEvent>,
    mut kills: EventReader<KillEvent>,
    mut rng: ResMut<SimulationRng>,
    mut cars: Query<(
        &mut Car,
        Option<&Transform>,
        Option<&DamageVisuals>,
        Option<&DetachableParts>,
    )>,
    mut parts: Query<&mut Visibility, With<HealthGroupPart>>,
    mut destroyed: EventWriter<VehicleDestroyed>,
    mut commands: Commands,
) {
    let mut outcomes: Vec<(Entity, Vec<DamageEffect>)> = Vec::new();
    for hit in hits.read() {
        let Ok((mut car, ..)) = cars.get_mut(hit.target) else {
            continue;
        };
        let outcome =
            car.apply_damage(hit.damage_type, hit.normal, hit.amount, rng.rng_mut());
        outcomes.push((hit.target, outcome.effects));
    }
    for kill in kills.read() {
        if let Ok((mut car, ..)) = cars.get_mut(kill.target) {
            outcomes.push((kill.target, car.kill()));
        }
    }

    for (entity, effects) in outcomes {
        let Ok((car, transform, visuals, wheels)) = cars.get(entity) else {
            continue;
        };
        for effect in effects {
            match effect {
                DamageEffect::VehicleHealthGroup { tier } => {
                    if let Some(visuals) = visuals {
                        show_health_group(visuals, tier, &mut parts);
                    }
                }
                DamageEffect::Destroyed => {
                    stage_wreck(
                        &mut commands,
                        entity,
                        &car,
                        transform.copied().unwrap_or_default(),
                        wheels,
                    );
                    destroyed.send(VehicleDestroyed {
                        entity,
                        name: car.name().to_string(),
                    });
                }
                DamageEffect::SystemHealthGroup { .. } => {}
            }
        }
    }
}

fn show_health_group(
    visuals: &DamageVisuals,
    tier: usize,
    parts: &mut Query<&mut Visibility, With<HealthGroupPart>>,
) {
    for (group, entities) in visuals.groups.iter().enumerate() {
        let wanted = if group == tier {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        for entity in entities {
            if let Ok(mut visibility) = parts.get_mut(*entity) {
                if *visibility != wanted {
                    *visibility = wanted;
                }
            }
        }
    }
}

fn stage_wreck(
    commands: &mut Commands,
    entity: Entity,
    car: &Car,
    transform: Transform,
    wheels: Option<&DetachableParts>,
) {
    commands
        .entity(entity)
        .remove::<PlayerControlled>()
        .insert(Wrecked);
    if let Some(wheels) = wheels {
        for wheel in &wheels.0 {
            if let Some(cmds) = commands.get_entity(*wheel) {
                cmds.despawn_recursive();
            }
        }
    }
    if let Some(explosion) = car.explosion() {
        commands.spawn((
            Name::new("Explosion"),
            transform,
            ExplosionFx {
                sound: explosion.sound,
                volume: explosion.volume,
                timer: Timer::from_seconds(EXPLOSION_LIFETIME, TimerMode::Once),
            },
        ));
    }
}

fn tick_engines(time: Res<Time>, mut cars: Query<&mut Car>) {
    let dt = time.delta_secs();
    for mut car in cars.iter_mut() {
        car.tick_engine(dt, DEFAULT_START_CLIP_SECONDS);
    }
}

fn fire_ai_weapons(
    order: Res<AiFireOrder>,
    mut cars: Query<&mut Car, Without<PlayerControlled>>,
) {
    if !order.0 {
        return;
    }
    for mut car in cars.iter_mut() {
        if let Some(weapons) = car.weapons_mut() {
            weapons.fire(Some(AI_WEAPON_SLOT));
        }
    }
}

/// Drains special triggers set by input during the last frame.
fn release_specials(mut cars: Query<(Entity, &mut Car)>, mut fired: EventWriter<SpecialFired>) {
    for (entity, mut car) in cars.iter_mut() {
        let Some(specials) = car.specials_mut() else {
            continue;
        };
        for slot in specials.take_triggered() {
            debug!(target: "car_combat.specials", ?entity, slot, "special fired");
            fired.send(SpecialFired { entity, slot });
        }
    }
}

/// Escape pushes an overlay camera over the main one (or pops it back),
/// M mutes the active listener.
fn handle_camera_keys(keys: Res<ButtonInput<KeyCode>>, mut cameras: ResMut<CameraStack>) {
    if keys.just_pressed(KeyCode::Escape) {
        if cameras.is_main_camera_active() {
            cameras.push();
        } else if cameras.depth() > 1 {
            cameras.pop();
        }
    }
    if keys.just_pressed(KeyCode::KeyM) {
        let enabled = !cameras.audio_enabled();
        cameras.set_audio_enabled(enabled);
    }
}

fn handle_player_input(
    keys: Res<ButtonInput<KeyCode>>,
    cameras: Res<CameraStack>,
    mut rig: ResMut<CameraRig>,
    mut fire_order: ResMut<AiFireOrder>,
    mut kills: EventWriter<KillEvent>,
    mut cars: Query<(Entity, &mut Car), With<PlayerControlled>>,
) {
    if !cameras.is_main_camera_active() {
        return;
    }

    for (entity, mut car) in cars.iter_mut() {
        if !car.is_alive() {
            continue;
        }

        if let Some(view) = VIEW_KEYS
            .iter()
            .find(|key| keys.just_pressed(**key))
            .and_then(|key| CameraView::from_key(*key))
        {
            rig.select(view);
        }

        if keys.just_pressed(KeyCode::KeyK) {
            kills.send(KillEvent { target: entity });
        }
        if keys.just_pressed(KeyCode::KeyZ) {
            fire_order.0 = !fire_order.0;
        }
        if keys.just_pressed(KeyCode::KeyI) {
            car.toggle_engine();
        }
        if keys.just_pressed(KeyCode::Enter) {
            if let Some(weapons) = car.weapons_mut() {
                weapons.cycle_weapon();
            }
        }

        handle_trigger_keys(&keys, &mut car);

        let mut throttle = 0.0;
        let mut steer = 0.0;
        if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
            throttle += 1.0;
        }
        if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
            throttle -= 1.0;
        }
        if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
            steer += 1.0;
        }
        if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
            steer -= 1.0;
        }
        let ebrake = keys.pressed(KeyCode::ShiftLeft);
        car.drive(throttle, steer, ebrake);
    }
}

const WEAPON_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

fn handle_trigger_keys(keys: &ButtonInput<KeyCode>, car: &mut Car) {
    let mut firing = false;
    if let Some(weapons) = car.weapons_mut() {
        if keys.pressed(KeyCode::Space) {
            weapons.fire(None);
            firing = true;
        } else if let Some(slot) = WEAPON_KEYS.iter().position(|key| keys.pressed(*key)) {
            weapons.fire(Some(slot));
            firing = true;
        }
    }

    if let Some(specials) = car.specials_mut() {
        if !firing && keys.pressed(KeyCode::Digit6) {
            specials.fire(0);
            firing = true;
        }
        if keys.pressed(KeyCode::Digit7) {
            specials.fire(1);
        }
        if keys.pressed(KeyCode::Digit8) {
            specials.fire(2);
        }
    }

    if !firing {
        if let Some(weapons) = car.weapons_mut() {
            weapons.stop_firing();
        }
    }
}

fn fall_back_to_chase(
    mut destroyed: EventReader<VehicleDestroyed>,
    cars: Query<&Car>,
    mut rig: ResMut<CameraRig>,
) {
    for event in destroyed.read() {
        if cars.get(event.entity).is_ok_and(|car| car.is_player) {
            rig.on_player_destroyed();
        }
    }
}

/// Shows the chassis model and wheels that belong to the player's view.
fn show_chassis_for_view(
    rig: Res<CameraRig>,
    cars: Query<(&Car, &ChassisModels, Option<&DetachableParts>)>,
    mut visibility: Query<&mut Visibility, Without<HealthGroupPart>>,
) {
    let chassis = rig.chassis();
    for (car, models, wheels) in &cars {
        if !car.is_player {
            continue;
        }
        let mut set = |entity: Entity, shown: bool| {
            let wanted = if shown {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
            if let Ok(mut visibility) = visibility.get_mut(entity) {
                if *visibility != wanted {
                    *visibility = wanted;
                }
            }
        };
        set(models.third_person, chassis == ChassisView::ThirdPerson);
        set(models.first_person, chassis == ChassisView::FirstPerson);
        for wheel in wheels.map(|w| w.0.as_slice()).unwrap_or_default() {
            set(*wheel, chassis.shows_wheels());
        }
    }
}

fn tear_down_cameras(mut exits: EventReader<AppExit>, mut cameras: ResMut<CameraStack>) {
    if exits.read().next().is_some() {
        cameras.teardown();
        debug!(target: "car_combat.camera", "camera stack torn down");
    }
}

fn update_engine_audio(
    cameras: Res<CameraStack>,
    mut cars: Query<(&Car, &Velocity, &mut EngineAudio)>,
) {
    let audible = cameras
        .main()
        .is_some_and(|main| cameras.listener_enabled(main));
    for (car, velocity, mut audio) in cars.iter_mut() {
        audio.audible = audible;
        audio.pitch = car.engine_pitch(velocity.0.length()).unwrap_or(0.0);
        if !car.is_alive() {
            audio.sounds = None;
            continue;
        }
        let sounds = car.engine_sounds();
        if audio.sounds != sounds {
            audio.sounds = sounds;
        }
    }
}

fn fade_explosions(
    time: Res<Time>,
    mut commands: Commands,
    mut explosions: Query<(Entity, &mut ExplosionFx)>,
) {
    for (entity, mut fx) in explosions.iter_mut() {
        if fx.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn configure_fixed_time(mut fixed_time: ResMut<Time<Fixed>>, params: Res<SimulationParams>) {
    fixed_time.set_timestep_seconds(params.fixed_delta);
}

/// Per-system tiers of the first live player car, for HUD readouts.
pub fn player_tiers(car: &Car) -> Vec<(SystemType, usize)> {
    SystemType::ALL
        .into_iter()
        .filter(|system| *system != SystemType::Vehicle)
        .map(|system| {
            let tier = car
                .systems_panel()
                .map(|panel| panel.tier(system))
                .unwrap_or_else(|| car.health_group(system));
            (system, tier)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::LifeState;
    use crate::zone::normal_from_angle;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(GameplayPlugin);
        app.add_systems(Startup, |mut commands: Commands| {
            spawn_car(
                &mut commands,
                &VehicleDefinition::default(),
                Transform::default(),
                true,
            );
        });
        app.update();
        app
    }

    fn car_entity(app: &mut App) -> Entity {
        let world = app.world_mut();
        let mut query = world.query_filtered::<Entity, With<Car>>();
        query.single(world)
    }

    #[test]
    fn spawn_caches_tier_variants_and_wheels() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        let world = app.world();
        let visuals = world.get::<DamageVisuals>(entity).unwrap();
        assert_eq!(4, visuals.groups.len());
        let wheels = world.get::<DetachableParts>(entity).unwrap();
        assert_eq!(4, wheels.0.len());
        assert!(world.get::<PlayerControlled>(entity).is_some());
    }

    #[test]
    fn kill_event_wrecks_car() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        app.world_mut().send_event(KillEvent { target: entity });
        app.world_mut().run_schedule(FixedUpdate);

        let world = app.world_mut();
        assert!(world.get::<Wrecked>(entity).is_some());
        assert!(world.get::<PlayerControlled>(entity).is_none());
        assert_eq!(
            LifeState::Destroyed,
            world.get::<Car>(entity).unwrap().state()
        );
        let mut wheels = world.query::<&DetachablePart>();
        assert_eq!(0, wheels.iter(world).count());
        let mut explosions = world.query::<&ExplosionFx>();
        assert_eq!(1, explosions.iter(world).count());
    }

    #[test]
    fn hit_event_damages_resolved_zone() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        app.world_mut().send_event(HitEvent {
            target: entity,
            damage_type: DamageType::Projectile,
            normal: normal_from_angle(200.0),
            amount: 50,
        });
        app.world_mut().run_schedule(FixedUpdate);

        let car = app.world().get::<Car>(entity).unwrap();
        assert_eq!(70, car.health(SystemType::BackArmor));
        assert_eq!(
            car.health_group(SystemType::BackArmor),
            car.systems_panel().unwrap().tier(SystemType::BackArmor)
        );
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.reset_all();
        for key in keys {
            input.press(*key);
        }
    }

    fn kills_this_frame(app: &App) -> usize {
        app.world()
            .resource::<Events<KillEvent>>()
            .iter_current_update_events()
            .count()
    }

    fn wreck(app: &mut App, entity: Entity) {
        app.world_mut().send_event(KillEvent { target: entity });
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn visibility(app: &App, entity: Entity) -> Visibility {
        *app.world().get::<Visibility>(entity).unwrap()
    }

    #[test]
    fn keys_kill_toggle_ai_fire_and_engine() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        press(&mut app, &[KeyCode::KeyK, KeyCode::KeyZ, KeyCode::KeyI]);
        app.update();

        assert_eq!(1, kills_this_frame(&app));
        assert!(app.world().resource::<AiFireOrder>().0);
        assert!(!app.world().get::<Car>(entity).unwrap().engine().running());

        app.world_mut().run_schedule(FixedUpdate);
        assert!(app.world().get::<Wrecked>(entity).is_some());
    }

    #[test]
    fn overlay_camera_blocks_player_input() {
        let mut app = headless_app();
        press(&mut app, &[KeyCode::Escape, KeyCode::KeyK]);
        app.update();
        assert_eq!(0, kills_this_frame(&app));
        let cameras = app.world().resource::<CameraStack>();
        assert!(!cameras.is_main_camera_active());
        assert_eq!(2, cameras.depth());

        press(&mut app, &[KeyCode::Escape]);
        app.update();
        assert!(app.world().resource::<CameraStack>().is_main_camera_active());

        press(&mut app, &[KeyCode::KeyK]);
        app.update();
        assert_eq!(1, kills_this_frame(&app));
    }

    #[test]
    fn overlay_camera_silences_engine() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        app.world_mut().resource_mut::<CameraStack>().push();
        app.update();
        assert!(!app.world().get::<EngineAudio>(entity).unwrap().audible);

        press(&mut app, &[KeyCode::Escape]);
        app.update();
        assert!(app.world().get::<EngineAudio>(entity).unwrap().audible);

        press(&mut app, &[KeyCode::KeyM]);
        app.update();
        assert!(!app.world().get::<EngineAudio>(entity).unwrap().audible);
    }

    #[test]
    fn wrecked_car_ignores_input() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        wreck(&mut app, entity);
        app.world_mut().resource_mut::<Events<KillEvent>>().clear();

        press(&mut app, &[KeyCode::KeyZ, KeyCode::KeyK]);
        app.update();
        assert!(!app.world().resource::<AiFireOrder>().0);
        assert_eq!(0, kills_this_frame(&app));
    }

    #[test]
    fn view_keys_swap_chassis_models() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        let (third, first) = {
            let models = app.world().get::<ChassisModels>(entity).unwrap();
            (models.third_person, models.first_person)
        };
        let wheel = app.world().get::<DetachableParts>(entity).unwrap().0[0];

        press(&mut app, &[KeyCode::F1]);
        app.update();
        assert_eq!(CameraView::Cockpit, app.world().resource::<CameraRig>().view());
        assert_eq!(Visibility::Hidden, visibility(&app, third));
        assert_eq!(Visibility::Inherited, visibility(&app, first));
        assert_eq!(Visibility::Hidden, visibility(&app, wheel));

        press(&mut app, &[KeyCode::F3]);
        app.update();
        assert_eq!(Visibility::Hidden, visibility(&app, third));
        assert_eq!(Visibility::Hidden, visibility(&app, first));

        press(&mut app, &[KeyCode::F5]);
        app.update();
        assert_eq!(CameraView::Wheel(1), app.world().resource::<CameraRig>().view());
        assert_eq!(Visibility::Inherited, visibility(&app, third));
        assert_eq!(Visibility::Inherited, visibility(&app, wheel));
    }

    #[test]
    fn destruction_forces_chase_view() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        let third = app.world().get::<ChassisModels>(entity).unwrap().third_person;
        press(&mut app, &[KeyCode::F1]);
        app.update();
        press(&mut app, &[]);

        wreck(&mut app, entity);
        app.update();
        assert_eq!(CameraView::Chase, app.world().resource::<CameraRig>().view());
        assert_eq!(Visibility::Inherited, visibility(&app, third));
    }

    #[test]
    fn special_six_yields_to_weapon_keys() {
        let mut car = Car::configure(&VehicleDefinition::default());
        let mut keys = ButtonInput::<KeyCode>::default();

        keys.press(KeyCode::Digit6);
        handle_trigger_keys(&keys, &mut car);
        assert_eq!(vec![0], car.specials_mut().unwrap().take_triggered());

        keys.press(KeyCode::Digit1);
        keys.press(KeyCode::Digit7);
        handle_trigger_keys(&keys, &mut car);
        assert_eq!(vec![1], car.specials_mut().unwrap().take_triggered());
        assert!(car.weapons().unwrap().is_firing());
    }

    #[test]
    fn weapons_stop_when_no_trigger_held() {
        let mut car = Car::configure(&VehicleDefinition::default());
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::Space);
        handle_trigger_keys(&keys, &mut car);
        assert!(car.weapons().unwrap().is_firing());

        keys.reset_all();
        handle_trigger_keys(&keys, &mut car);
        assert!(!car.weapons().unwrap().is_firing());
    }

    #[test]
    fn fixed_step_drains_special_triggers() {
        let mut app = headless_app();
        let entity = car_entity(&mut app);
        app.world_mut()
            .get_mut::<Car>(entity)
            .unwrap()
            .specials_mut()
            .unwrap()
            .fire(2);
        app.world_mut().run_schedule(FixedUpdate);

        let fired: Vec<SpecialFired> = app
            .world()
            .resource::<Events<SpecialFired>>()
            .iter_current_update_events()
            .copied()
            .collect();
        assert_eq!(vec![SpecialFired { entity, slot: 2 }], fired);
        let mut car = app.world_mut().get_mut::<Car>(entity).unwrap();
        assert!(car.specials_mut().unwrap().take_triggered().is_empty());
    }

    #[test]
    fn engine_restarts_and_explosion_fades_over_time() {
        let mut app = headless_app();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        let entity = car_entity(&mut app);
        {
            let mut car = app.world_mut().get_mut::<Car>(entity).unwrap();
            car.toggle_engine();
            car.toggle_engine();
            assert!(car.engine().starting());
        }
        for _ in 0..20 {
            app.update();
        }
        assert!(app.world().get::<Car>(entity).unwrap().engine().running());

        app.world_mut().send_event(KillEvent { target: entity });
        for _ in 0..40 {
            app.update();
        }
        let world = app.world_mut();
        assert!(world.get::<Wrecked>(entity).is_some());
        let mut explosions = world.query::<&ExplosionFx>();
        assert_eq!(0, explosions.iter(world).count());
    }
}
