use std::path::Path;

use car_combat::zone::impact_angle;
use car_combat::{Car, Quadrant, VehicleDefinition};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::report::{HitRecord, SimulationReport};
use crate::scenario::{ScenarioConfig, ScenarioError, ScriptedHit};

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub run_id: String,
    /// Takes precedence over the scenario's own seed.
    pub seed: Option<u64>,
}

impl RunOptions {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

pub fn run_scenario(
    config: &ScenarioConfig,
    options: &RunOptions,
) -> Result<SimulationReport, ScenarioError> {
    let definition = config.load_vehicle()?;
    let seed = options.seed.or(config.seed).unwrap_or(DEFAULT_SEED);
    run_hits(&options.run_id, &definition, &config.hits, seed)
}

/// Fires every hit (expanded by `repeat`) at a fresh car built from
/// `definition`. Hits landing on a wreck are recorded but change nothing.
pub fn run_hits(
    run_id: &str,
    definition: &VehicleDefinition,
    hits: &[ScriptedHit],
    seed: u64,
) -> Result<SimulationReport, ScenarioError> {
    let mut car = Car::configure(definition);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();

    for (hit_index, hit) in hits.iter().enumerate() {
        let normal = hit.normal(hit_index)?;
        let angle = impact_angle(normal);
        for _ in 0..hit.repeat {
            let accepted = car.is_alive();
            let outcome = car.apply_damage(hit.damage_type, normal, hit.amount, &mut rng);
            debug!(
                target: "damage_lab",
                index = records.len(),
                target_system = ?outcome.target,
                effects = outcome.effects.len(),
                "hit resolved"
            );
            records.push(HitRecord {
                index: records.len(),
                damage_type: hit.damage_type,
                angle,
                quadrant: Quadrant::from_angle(angle),
                amount: hit.amount,
                accepted,
                target: outcome.target,
                effects: outcome.effects,
            });
        }
    }

    let report = SimulationReport::new(run_id, seed, &car, records);
    info!(
        target: "damage_lab",
        vehicle = %report.vehicle,
        status = ?report.summary.status,
        hits = report.hits.len(),
        "simulation finished"
    );
    Ok(report)
}

/// Runs the same barrage against every vehicle definition under `dir`.
pub fn sweep(
    dir: &Path,
    run_id: &str,
    hits: &[ScriptedHit],
    seed: u64,
) -> Result<Vec<SimulationReport>, ScenarioError> {
    let mut reports = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        if !entry.file_type().is_file() || !is_toml {
            continue;
        }
        let definition = VehicleDefinition::from_path(path)?;
        let id = format!("{run_id}-{}", definition.name.to_lowercase());
        reports.push(run_hits(&id, &definition, hits, seed)?);
    }
    Ok(reports)
}
