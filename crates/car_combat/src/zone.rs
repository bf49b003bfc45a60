//! Hit-zone resolution from impact normals.

use bevy::math::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::systems::SystemType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Projectile,
    Force,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    Front,
    Right,
    Back,
    Left,
}

impl Quadrant {
    /// Boundary angles belong to the higher quadrant.
    pub fn from_angle(degrees: f32) -> Self {
        let angle = normalize_degrees(degrees);
        if (45.0..135.0).contains(&angle) {
            Quadrant::Right
        } else if (135.0..225.0).contains(&angle) {
            Quadrant::Back
        } else if (225.0..315.0).contains(&angle) {
            Quadrant::Left
        } else {
            Quadrant::Front
        }
    }

    pub fn system(self, damage_type: DamageType) -> SystemType {
        match (damage_type, self) {
            (DamageType::Force, Quadrant::Front) => SystemType::FrontChassis,
            (DamageType::Force, Quadrant::Right) => SystemType::RightChassis,
            (DamageType::Force, Quadrant::Back) => SystemType::BackChassis,
            (DamageType::Force, Quadrant::Left) => SystemType::LeftChassis,
            (DamageType::Projectile, Quadrant::Front) => SystemType::FrontArmor,
            (DamageType::Projectile, Quadrant::Right) => SystemType::RightArmor,
            (DamageType::Projectile, Quadrant::Back) => SystemType::BackArmor,
            (DamageType::Projectile, Quadrant::Left) => SystemType::LeftArmor,
        }
    }
}

/// Z angle (degrees, `[0, 360)`) of the rotation taking world-up onto `normal`.
///
/// Euler angles are extracted in Y-X-Z order so the z component matches the
/// roll a transform would report for the same rotation. A degenerate normal
/// resolves to 0, i.e. a frontal hit.
pub fn impact_angle(normal: Vec3) -> f32 {
    let normal = normal.normalize_or_zero();
    if normal == Vec3::ZERO {
        return 0.0;
    }
    let rotation = Quat::from_rotation_arc(Vec3::Y, normal);
    let (_, _, z) = rotation.to_euler(EulerRot::YXZ);
    normalize_degrees(z.to_degrees())
}

pub fn resolve(normal: Vec3, damage_type: DamageType) -> SystemType {
    Quadrant::from_angle(impact_angle(normal)).system(damage_type)
}

/// Normal produced by rolling world-up by `degrees` around +Z.
pub fn normal_from_angle(degrees: f32) -> Vec3 {
    Quat::from_rotation_z(degrees.to_radians()) * Vec3::Y
}

fn normalize_degrees(degrees: f32) -> f32 {
    let angle = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}
