use serde::{Deserialize, Serialize};

pub const SYSTEM_COUNT: usize = 16;

/// Vehicle subsystems that carry their own hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    Vehicle,
    Suspension,
    Brakes,
    Engine,
    FrontArmor,
    RightArmor,
    BackArmor,
    LeftArmor,
    FrontChassis,
    RightChassis,
    BackChassis,
    LeftChassis,
    TireFL,
    TireFR,
    TireBL,
    TireBR,
}

/// Systems eligible to absorb overflow from a destroyed zone, in pick order.
pub const CORE_SYSTEMS: [SystemType; 4] = [
    SystemType::Vehicle,
    SystemType::Brakes,
    SystemType::Engine,
    SystemType::Suspension,
];

impl SystemType {
    pub const ALL: [SystemType; SYSTEM_COUNT] = [
        SystemType::Vehicle,
        SystemType::Suspension,
        SystemType::Brakes,
        SystemType::Engine,
        SystemType::FrontArmor,
        SystemType::RightArmor,
        SystemType::BackArmor,
        SystemType::LeftArmor,
        SystemType::FrontChassis,
        SystemType::RightChassis,
        SystemType::BackChassis,
        SystemType::LeftChassis,
        SystemType::TireFL,
        SystemType::TireFR,
        SystemType::TireBL,
        SystemType::TireBR,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_core(self) -> bool {
        CORE_SYSTEMS.contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            SystemType::Vehicle => "vehicle",
            SystemType::Suspension => "suspension",
            SystemType::Brakes => "brakes",
            SystemType::Engine => "engine",
            SystemType::FrontArmor => "front armor",
            SystemType::RightArmor => "right armor",
            SystemType::BackArmor => "back armor",
            SystemType::LeftArmor => "left armor",
            SystemType::FrontChassis => "front chassis",
            SystemType::RightChassis => "right chassis",
            SystemType::BackChassis => "back chassis",
            SystemType::LeftChassis => "left chassis",
            SystemType::TireFL => "tire FL",
            SystemType::TireFR => "tire FR",
            SystemType::TireBL => "tire BL",
            SystemType::TireBR => "tire BR",
        }
    }
}
