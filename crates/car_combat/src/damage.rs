//! Zone damage, overflow routing into core systems and the destruction
//! transition.
//!
//! Mutations report their side effects as an ordered list of
//! [`DamageEffect`]s. The owner of the model dispatches them to the systems
//! panel, the visual parts and the destruction sequence.

use bevy::math::Vec3;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::definition::VehicleDefinition;
use crate::health::{group_count, health_group, HealthTable};
use crate::systems::{SystemType, CORE_SYSTEMS};
use crate::zone::{self, DamageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    Alive,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DamageEffect {
    /// A non-vehicle system changed health; `dirty` asks the panel to redraw.
    SystemHealthGroup {
        system: SystemType,
        tier: usize,
        dirty: bool,
    },
    /// The overall vehicle crossed into a different visual stage.
    VehicleHealthGroup { tier: usize },
    /// Emitted exactly once, when the vehicle health reaches zero.
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct DamageModel {
    table: HealthTable,
    vehicle_groups: usize,
    visual_tier: usize,
}

impl DamageModel {
    pub fn new(definition: &VehicleDefinition) -> Self {
        Self::with_table(
            HealthTable::from_definition(definition),
            definition.health_groups,
        )
    }

    pub fn with_table(table: HealthTable, vehicle_groups: usize) -> Self {
        Self {
            table,
            vehicle_groups: vehicle_groups.max(1),
            visual_tier: 0,
        }
    }

    pub fn table(&self) -> &HealthTable {
        &self.table
    }

    pub fn health(&self, system: SystemType) -> i32 {
        self.table.current(system)
    }

    pub fn is_alive(&self) -> bool {
        self.table.is_functional(SystemType::Vehicle)
    }

    pub fn state(&self) -> LifeState {
        if self.is_alive() {
            LifeState::Alive
        } else {
            LifeState::Destroyed
        }
    }

    /// Tier currently shown by the third-person model.
    pub fn visual_tier(&self) -> usize {
        self.visual_tier
    }

    pub fn vehicle_groups(&self) -> usize {
        self.vehicle_groups
    }

    pub fn health_group(&self, system: SystemType) -> usize {
        health_group(
            self.table.current(system),
            self.table.start(system),
            group_count(system, self.vehicle_groups),
        )
    }

    /// Resolves the struck zone from `normal` and subtracts `amount` from it.
    /// Returns the zone that took the hit.
    pub fn apply_damage<R: Rng + ?Sized>(
        &mut self,
        damage_type: DamageType,
        normal: Vec3,
        amount: u32,
        rng: &mut R,
        effects: &mut Vec<DamageEffect>,
    ) -> SystemType {
        let target = zone::resolve(normal, damage_type);
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        let value = self.table.current(target).saturating_sub(amount);
        self.set_component_health(target, value, rng, effects);
        target
    }

    pub fn set_component_health<R: Rng + ?Sized>(
        &mut self,
        system: SystemType,
        value: i32,
        rng: &mut R,
        effects: &mut Vec<DamageEffect>,
    ) {
        if !self.is_alive() {
            return;
        }

        trace!(target: "car_combat.damage", ?system, value, "set component health");
        self.table.set(system, value);

        if system == SystemType::Vehicle {
            self.refresh_visual_tier(effects);
            if value <= 0 {
                info!(target: "car_combat.damage", health = value, "vehicle destroyed");
                effects.push(DamageEffect::Destroyed);
            }
        } else if value < 0 {
            self.table.set(system, 0);
            let core = self.core_component(rng);
            debug!(
                target: "car_combat.damage",
                from = ?system,
                to = ?core,
                overflow = -value,
                "routing overflow damage"
            );
            let next = self.table.current(core).saturating_add(value);
            self.set_component_health(core, next, rng, effects);
        }

        if system != SystemType::Vehicle && self.is_alive() {
            effects.push(DamageEffect::SystemHealthGroup {
                system,
                tier: self.health_group(system),
                dirty: true,
            });
        }
    }

    /// Drops the vehicle straight to zero health.
    pub fn kill(&mut self, effects: &mut Vec<DamageEffect>) {
        if !self.is_alive() {
            return;
        }
        self.table.set(SystemType::Vehicle, 0);
        self.refresh_visual_tier(effects);
        info!(target: "car_combat.damage", "vehicle killed");
        effects.push(DamageEffect::Destroyed);
    }

    /// Uniform pick among the core systems that still have health, falling
    /// back to the vehicle itself.
    pub fn core_component<R: Rng + ?Sized>(&self, rng: &mut R) -> SystemType {
        let alive: Vec<SystemType> = CORE_SYSTEMS
            .into_iter()
            .filter(|system| self.table.is_functional(*system))
            .collect();
        if alive.is_empty() {
            SystemType::Vehicle
        } else {
            alive[rng.gen_range(0..alive.len())]
        }
    }

    fn refresh_visual_tier(&mut self, effects: &mut Vec<DamageEffect>) {
        let tier = self.health_group(SystemType::Vehicle);
        if tier != self.visual_tier {
            self.visual_tier = tier;
            effects.push(DamageEffect::VehicleHealthGroup { tier });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ZoneValues;
    use crate::zone::normal_from_angle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model() -> DamageModel {
        DamageModel::new(&VehicleDefinition {
            armor: ZoneValues::uniform(120),
            chassis: ZoneValues::uniform(100),
            ..Default::default()
        })
    }

    #[test]
    fn hit_within_zone_only_touches_zone() {
        let mut model = model();
        let mut rng = StdRng::seed_from_u64(1);
        let mut effects = Vec::new();
        let target = model.apply_damage(
            DamageType::Projectile,
            normal_from_angle(100.0),
            30,
            &mut rng,
            &mut effects,
        );
        assert_eq!(SystemType::RightArmor, target);
        assert_eq!(90, model.health(SystemType::RightArmor));
        assert_eq!(550, model.health(SystemType::Vehicle));
        assert_eq!(
            vec![DamageEffect::SystemHealthGroup {
                system: SystemType::RightArmor,
                tier: 1,
                dirty: true,
            }],
            effects
        );
    }

    #[test]
    fn overflow_drains_into_core_and_conserves_damage() {
        for seed in 0..32 {
            let mut model = model();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut effects = Vec::new();
            model.apply_damage(
                DamageType::Force,
                normal_from_angle(10.0),
                300,
                &mut rng,
                &mut effects,
            );
            assert_eq!(0, model.health(SystemType::FrontChassis));
            assert_eq!(300, model.table().total_lost(), "seed {seed}");
            for (system, current, _) in model.table().iter() {
                if system != SystemType::Vehicle {
                    assert!(current >= 0, "{system:?} left at {current}");
                }
            }
        }
    }

    #[test]
    fn scenario_600_force_front_destroys_or_drains() {
        for seed in 0..32 {
            let mut model = model();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut effects = Vec::new();
            let target = model.apply_damage(
                DamageType::Force,
                normal_from_angle(10.0),
                600,
                &mut rng,
                &mut effects,
            );
            assert_eq!(SystemType::FrontChassis, target);
            assert_eq!(600, model.table().total_lost());
            // 500 overflow can never exceed 550 + 3 * 250 of core pools
            assert!(model.is_alive());
        }
    }

    #[test]
    fn overflow_beyond_core_pools_destroys_vehicle() {
        let mut model = model();
        let mut rng = StdRng::seed_from_u64(7);
        let mut effects = Vec::new();
        model.apply_damage(
            DamageType::Force,
            normal_from_angle(10.0),
            2000,
            &mut rng,
            &mut effects,
        );
        assert_eq!(LifeState::Destroyed, model.state());
        assert_eq!(2000, model.table().total_lost());
        let destroyed = effects
            .iter()
            .filter(|e| matches!(e, DamageEffect::Destroyed))
            .count();
        assert_eq!(1, destroyed);
        assert_eq!(
            Some(&DamageEffect::VehicleHealthGroup { tier: 3 }),
            effects
                .iter()
                .find(|e| matches!(e, DamageEffect::VehicleHealthGroup { .. }))
        );
    }

    #[test]
    fn destroyed_vehicle_ignores_damage() {
        let mut model = model();
        let mut rng = StdRng::seed_from_u64(3);
        let mut effects = Vec::new();
        model.kill(&mut effects);
        let snapshot = model.table().clone();
        effects.clear();
        for _ in 0..5 {
            model.apply_damage(
                DamageType::Projectile,
                normal_from_angle(200.0),
                80,
                &mut rng,
                &mut effects,
            );
        }
        model.kill(&mut effects);
        assert_eq!(&snapshot, model.table());
        assert!(effects.is_empty());
    }

    #[test]
    fn core_component_falls_back_to_vehicle() {
        let mut model = model();
        let mut rng = StdRng::seed_from_u64(9);
        for system in CORE_SYSTEMS {
            model.table.set(system, 0);
        }
        assert_eq!(SystemType::Vehicle, model.core_component(&mut rng));
    }

    #[test]
    fn core_component_skips_dead_systems() {
        let mut model = model();
        let mut rng = StdRng::seed_from_u64(11);
        model.table.set(SystemType::Brakes, 0);
        model.table.set(SystemType::Engine, 0);
        for _ in 0..64 {
            let pick = model.core_component(&mut rng);
            assert!(matches!(
                pick,
                SystemType::Vehicle | SystemType::Suspension
            ));
        }
    }

    #[test]
    fn vehicle_tier_only_reported_on_change() {
        let mut model = model();
        let mut rng = StdRng::seed_from_u64(0);
        let mut effects = Vec::new();
        model.set_component_health(SystemType::Vehicle, 540, &mut rng, &mut effects);
        assert!(effects.is_empty());
        model.set_component_health(SystemType::Vehicle, 200, &mut rng, &mut effects);
        assert_eq!(vec![DamageEffect::VehicleHealthGroup { tier: 1 }], effects);
        assert_eq!(1, model.visual_tier());
    }
}
