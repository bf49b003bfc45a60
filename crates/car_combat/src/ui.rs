use bevy::prelude::*;

use crate::car::Car;
use crate::gameplay::{player_tiers, AiFireOrder, PlayerControlled, SimulationParams};
use crate::systems::SystemType;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(5, 6, 16)))
            .add_systems(Startup, spawn_systems_hud)
            .add_systems(Update, update_systems_hud);
    }
}

#[derive(Component)]
struct SystemsHud;

fn spawn_systems_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Waiting for player car…"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.86, 0.93, 1.0)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
        SystemsHud,
    ));
}

/// Cached per-system HUD rows. Only rows the systems panel flags as dirty
/// are re-rendered; a new player car rebuilds them all.
#[derive(Debug, Default)]
struct HudRows {
    owner: Option<Entity>,
    rows: Vec<String>,
}

impl HudRows {
    fn render(system: SystemType, car: &Car, tier: usize) -> String {
        format!(
            "{:<14} {:>4} {}\n",
            system.label(),
            car.health(system),
            tier_bar(tier)
        )
    }

    /// Returns how many rows were re-rendered.
    fn refresh(&mut self, entity: Entity, car: &mut Car) -> usize {
        if self.owner != Some(entity) {
            self.owner = Some(entity);
            self.rows = vec![String::new(); SystemType::ALL.len()];
            if let Some(panel) = car.systems_panel_mut() {
                panel.take_dirty();
            }
            let tiers = player_tiers(car);
            for (system, tier) in &tiers {
                self.rows[system.index()] = Self::render(*system, car, *tier);
            }
            return tiers.len();
        }
        let dirty = car
            .systems_panel_mut()
            .map(|panel| panel.take_dirty())
            .unwrap_or_default();
        for system in &dirty {
            if *system == SystemType::Vehicle {
                continue;
            }
            let tier = car
                .systems_panel()
                .map(|panel| panel.tier(*system))
                .unwrap_or_default();
            self.rows[system.index()] = Self::render(*system, car, tier);
        }
        dirty.len()
    }
}

fn update_systems_hud(
    mut text: Query<&mut Text, With<SystemsHud>>,
    mut cars: Query<(Entity, &mut Car), With<PlayerControlled>>,
    mut rows: Local<HudRows>,
    params: Option<Res<SimulationParams>>,
    fire_order: Res<AiFireOrder>,
) {
    let Ok(mut text) = text.get_single_mut() else {
        return;
    };
    let seed = params.map(|p| p.seed).unwrap_or_default();
    let Ok((entity, mut car)) = cars.get_single_mut() else {
        rows.owner = None;
        let content = format!("No player car (seed {seed})\nvehicle wrecked or not spawned");
        content.clone_into(&mut **text);
        return;
    };

    rows.refresh(entity, &mut car);
    let weapon = match car.weapons() {
        Some(weapons) => format!(
            "weapon {}{}",
            weapons.selected() + 1,
            if weapons.is_firing() { " firing" } else { "" }
        ),
        None => "no weapons".to_owned(),
    };
    let mut content = format!(
        "{}  seed {seed}\nvehicle {} hp  stage {}/{}\nengine {}  AI fire {}  {weapon}\n",
        car.name(),
        car.health(SystemType::Vehicle),
        car.damage_model().visual_tier(),
        car.damage_model().vehicle_groups().saturating_sub(1),
        if car.engine().running() { "on" } else { "off" },
        if fire_order.0 { "on" } else { "off" },
    );
    for row in &rows.rows {
        content.push_str(row);
    }
    if **text != content {
        content.clone_into(&mut **text);
    }
}

fn tier_bar(tier: usize) -> String {
    let filled = 4usize.saturating_sub(tier);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(4 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::definition::VehicleDefinition;
    use crate::zone::normal_from_angle;
    use crate::DamageType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn only_dirty_rows_are_rerendered() {
        let mut car = Car::configure(&VehicleDefinition::default());
        let mut rows = HudRows::default();
        let entity = Entity::from_raw(1);
        assert_eq!(15, rows.refresh(entity, &mut car));
        assert_eq!(0, rows.refresh(entity, &mut car));

        let mut rng = StdRng::seed_from_u64(1);
        car.apply_damage(DamageType::Projectile, normal_from_angle(100.0), 60, &mut rng);
        assert_eq!(1, rows.refresh(entity, &mut car));
        assert!(rows.rows[SystemType::RightArmor.index()].contains("60"));
        assert_eq!(0, rows.refresh(entity, &mut car));
    }

    #[test]
    fn tier_bar_empties_with_damage() {
        assert_eq!("[####]", tier_bar(0));
        assert_eq!("[#...]", tier_bar(3));
        assert_eq!("[....]", tier_bar(4));
        assert_eq!("[....]", tier_bar(9));
    }
}
