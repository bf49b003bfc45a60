use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::systems::{SystemType, SYSTEM_COUNT};

pub const VEHICLE_START_HEALTH: i32 = 550;
pub const CORE_START_HEALTH: i32 = 250;
pub const TIRE_START_HEALTH: i32 = 100;
pub const SYSTEM_HEALTH_GROUPS: usize = 5;

const MIN_VEHICLE_SIZE: u8 = 1;
const MAX_VEHICLE_SIZE: u8 = 6;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read vehicle definition {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed vehicle definition")]
    Parse(#[from] toml::de::Error),
    #[error("vehicle `{name}` needs at least one health group")]
    NoHealthGroups { name: String },
    #[error("vehicle `{name}` has unknown size class {size}")]
    UnknownSize { name: String, size: u8 },
    #[error("vehicle `{name}` has negative hit points for {zone}")]
    NegativeHitPoints { name: String, zone: &'static str },
}

/// Per-side hit points for one zone family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ZoneValues {
    pub front: i32,
    pub right: i32,
    pub rear: i32,
    pub left: i32,
}

impl ZoneValues {
    pub const fn uniform(value: i32) -> Self {
        Self {
            front: value,
            right: value,
            rear: value,
            left: value,
        }
    }
}

/// Static description of a vehicle: armor and chassis layout plus the number
/// of visual damage stages its third-person model ships with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleDefinition {
    pub name: String,
    #[serde(default = "default_vehicle_size")]
    pub vehicle_size: u8,
    pub health_groups: usize,
    #[serde(default = "default_mass")]
    pub mass: f32,
    pub armor: ZoneValues,
    pub chassis: ZoneValues,
    #[serde(default = "default_weapons")]
    pub weapons: usize,
    #[serde(default = "default_specials")]
    pub specials: usize,
}

fn default_weapons() -> usize {
    2
}

fn default_specials() -> usize {
    3
}

fn default_vehicle_size() -> u8 {
    2
}

fn default_mass() -> f32 {
    1500.0
}

impl VehicleDefinition {
    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let data = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definition = Self::from_toml_str(&data)?;
        info!(
            target: "car_combat.definition",
            name = %definition.name,
            path = %path.display(),
            "vehicle definition loaded"
        );
        Ok(definition)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, DefinitionError> {
        let definition: VehicleDefinition = toml::from_str(data)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.health_groups == 0 {
            return Err(DefinitionError::NoHealthGroups {
                name: self.name.clone(),
            });
        }
        if !(MIN_VEHICLE_SIZE..=MAX_VEHICLE_SIZE).contains(&self.vehicle_size) {
            return Err(DefinitionError::UnknownSize {
                name: self.name.clone(),
                size: self.vehicle_size,
            });
        }
        for (zone, value) in [
            ("front armor", self.armor.front),
            ("right armor", self.armor.right),
            ("rear armor", self.armor.rear),
            ("left armor", self.armor.left),
            ("front chassis", self.chassis.front),
            ("right chassis", self.chassis.right),
            ("rear chassis", self.chassis.rear),
            ("left chassis", self.chassis.left),
        ] {
            if value < 0 {
                return Err(DefinitionError::NegativeHitPoints {
                    name: self.name.clone(),
                    zone,
                });
            }
        }
        Ok(())
    }

    /// Starting hit points for every system, indexed by `SystemType`.
    pub fn start_hit_points(&self) -> [i32; SYSTEM_COUNT] {
        let mut points = [0; SYSTEM_COUNT];
        for system in SystemType::ALL {
            points[system.index()] = match system {
                SystemType::Vehicle => VEHICLE_START_HEALTH,
                SystemType::Suspension | SystemType::Brakes | SystemType::Engine => {
                    CORE_START_HEALTH
                }
                SystemType::FrontArmor => self.armor.front,
                SystemType::RightArmor => self.armor.right,
                SystemType::BackArmor => self.armor.rear,
                SystemType::LeftArmor => self.armor.left,
                SystemType::FrontChassis => self.chassis.front,
                SystemType::RightChassis => self.chassis.right,
                SystemType::BackChassis => self.chassis.rear,
                SystemType::LeftChassis => self.chassis.left,
                SystemType::TireFL
                | SystemType::TireFR
                | SystemType::TireBL
                | SystemType::TireBR => TIRE_START_HEALTH,
            };
        }
        points
    }
}

impl Default for VehicleDefinition {
    fn default() -> Self {
        Self {
            name: "Piranha".into(),
            vehicle_size: default_vehicle_size(),
            health_groups: 4,
            mass: default_mass(),
            armor: ZoneValues::uniform(120),
            chassis: ZoneValues::uniform(100),
            weapons: default_weapons(),
            specials: default_specials(),
        }
    }
}
