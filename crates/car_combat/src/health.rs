use serde::Serialize;

use crate::definition::{VehicleDefinition, SYSTEM_HEALTH_GROUPS};
use crate::systems::{SystemType, SYSTEM_COUNT};

/// Starting and current hit points for every subsystem of one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthTable {
    start: [i32; SYSTEM_COUNT],
    current: [i32; SYSTEM_COUNT],
}

impl HealthTable {
    pub fn new(start: [i32; SYSTEM_COUNT]) -> Self {
        Self {
            start,
            current: start,
        }
    }

    pub fn from_definition(definition: &VehicleDefinition) -> Self {
        Self::new(definition.start_hit_points())
    }

    pub fn start(&self, system: SystemType) -> i32 {
        self.start[system.index()]
    }

    pub fn current(&self, system: SystemType) -> i32 {
        self.current[system.index()]
    }

    pub(crate) fn set(&mut self, system: SystemType, value: i32) {
        self.current[system.index()] = value;
    }

    pub fn is_functional(&self, system: SystemType) -> bool {
        self.current(system) > 0
    }

    /// Hit points lost so far across all systems. Negative vehicle health
    /// counts in full.
    pub fn total_lost(&self) -> i64 {
        self.start
            .iter()
            .zip(self.current.iter())
            .map(|(start, current)| i64::from(*start) - i64::from(*current))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SystemType, i32, i32)> + '_ {
        SystemType::ALL
            .into_iter()
            .map(move |system| (system, self.current(system), self.start(system)))
    }
}

/// Maps remaining health onto a visual damage tier: 0 is pristine,
/// `group_count - 1` is wrecked. Rounds towards showing damage early.
pub fn health_group(current: i32, start: i32, group_count: usize) -> usize {
    let max_tier = group_count.saturating_sub(1);
    if current <= 0 || start <= 0 {
        return max_tier;
    }
    // ceil(current / start * max_tier) without float rounding drift
    let scaled = i64::from(current) * max_tier as i64;
    let start = i64::from(start);
    let filled = ((scaled + start - 1) / start) as usize;
    max_tier - filled.min(max_tier)
}

/// Number of visual stages tracked for `system`.
pub fn group_count(system: SystemType, vehicle_groups: usize) -> usize {
    if system == SystemType::Vehicle {
        vehicle_groups
    } else {
        SYSTEM_HEALTH_GROUPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_health_is_tier_zero() {
        assert_eq!(0, health_group(550, 550, 4));
        assert_eq!(0, health_group(100, 100, 5));
    }

    #[test]
    fn dead_is_last_tier() {
        assert_eq!(3, health_group(0, 550, 4));
        assert_eq!(4, health_group(-20, 100, 5));
    }

    #[test]
    fn ceiling_shows_damage_early() {
        // 99% -> ceil(3.96) = 4 -> tier 0; 74% -> ceil(2.96) = 3 -> tier 1
        assert_eq!(0, health_group(99, 100, 5));
        assert_eq!(1, health_group(74, 100, 5));
        assert_eq!(2, health_group(50, 100, 5));
        assert_eq!(3, health_group(1, 100, 5));
    }

    #[test]
    fn tiers_are_monotonic_in_health() {
        let mut previous = usize::MAX;
        for current in 0..=550 {
            let tier = health_group(current, 550, 6);
            assert!(tier <= previous, "tier rose at {current}");
            previous = tier;
        }
        assert_eq!(0, previous);
    }

    #[test]
    fn single_group_never_changes() {
        assert_eq!(0, health_group(550, 550, 1));
        assert_eq!(0, health_group(0, 550, 1));
    }

    #[test]
    fn total_lost_counts_negative_vehicle() {
        let mut table = HealthTable::from_definition(&VehicleDefinition::default());
        table.set(SystemType::Vehicle, -30);
        table.set(SystemType::FrontArmor, 0);
        assert_eq!(580 + 120, table.total_lost());
    }
}
