use std::fs;
use std::path::{Path, PathBuf};

use car_combat::zone::normal_from_angle;
use car_combat::{DamageType, DefinitionError, Vec3, VehicleDefinition};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scenario")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error("hit #{index} needs exactly one of `normal` or `angle`")]
    HitDirection { index: usize },
    #[error("hit #{index} has zero damage")]
    ZeroDamage { index: usize },
    #[error("failed to walk vehicle directory")]
    Walk(#[from] walkdir::Error),
}

/// A scripted barrage against one vehicle definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub vehicle: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub hits: Vec<ScriptedHit>,
    #[serde(default)]
    pub report: Option<ReportConfig>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl ScenarioConfig {
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let data = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg = Self::from_toml_str(&data)?;
        cfg.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(cfg)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, ScenarioError> {
        let cfg: ScenarioConfig = toml::from_str(data)?;
        cfg.validate_hits()?;
        Ok(cfg)
    }

    /// Vehicle definitions are looked up next to the scenario file.
    pub fn vehicle_path(&self) -> PathBuf {
        self.resolve(&self.vehicle)
    }

    /// Report output is resolved the same way, so runs do not depend on the
    /// working directory.
    pub fn report_path(&self) -> Option<PathBuf> {
        self.report
            .as_ref()
            .map(|report| self.resolve(&report.path))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn load_vehicle(&self) -> Result<VehicleDefinition, ScenarioError> {
        Ok(VehicleDefinition::from_path(&self.vehicle_path())?)
    }

    pub fn validate_hits(&self) -> Result<(), ScenarioError> {
        for (index, hit) in self.hits.iter().enumerate() {
            hit.normal(index)?;
            if hit.amount == 0 {
                return Err(ScenarioError::ZeroDamage { index });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedHit {
    pub damage_type: DamageType,
    pub amount: u32,
    #[serde(default)]
    pub normal: Option<[f32; 3]>,
    /// Degrees of roll applied to world-up around +Z.
    #[serde(default)]
    pub angle: Option<f32>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

impl ScriptedHit {
    pub fn normal(&self, index: usize) -> Result<Vec3, ScenarioError> {
        match (self.normal, self.angle) {
            (Some(normal), None) => Ok(Vec3::from_array(normal)),
            (None, Some(angle)) => Ok(normal_from_angle(angle)),
            _ => Err(ScenarioError::HitDirection { index }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub path: PathBuf,
}
