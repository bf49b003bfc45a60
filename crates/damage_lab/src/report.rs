use car_combat::{
    Car, DamageEffect, DamageType, ExplosionReport, LifeState, Quadrant, SystemType,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub id: String,
    pub timestamp: String,
    pub vehicle: String,
    pub seed: u64,
    pub summary: ReportSummary,
    pub hits: Vec<HitRecord>,
    pub systems: Vec<SystemRecord>,
    pub explosion: Option<ExplosionReport>,
}

impl SimulationReport {
    pub fn new(id: impl Into<String>, seed: u64, car: &Car, hits: Vec<HitRecord>) -> Self {
        let systems = SystemRecord::collect(car);
        let summary = summarize(car, &hits);
        Self {
            id: id.into(),
            timestamp: Utc::now().to_rfc3339(),
            vehicle: car.name().to_owned(),
            seed,
            summary,
            hits,
            systems,
            explosion: car.explosion().cloned(),
        }
    }

    pub fn destroyed(&self) -> bool {
        self.summary.status == ReportStatus::Destroyed
    }
}

fn summarize(car: &Car, hits: &[HitRecord]) -> ReportSummary {
    let table = car.damage_model().table();
    let status = if car.state() == LifeState::Destroyed {
        ReportStatus::Destroyed
    } else if table.total_lost() > 0 {
        ReportStatus::Damaged
    } else {
        ReportStatus::Intact
    };
    ReportSummary {
        status,
        hits_applied: hits.iter().filter(|h| h.accepted).count(),
        hits_ignored: hits.iter().filter(|h| !h.accepted).count(),
        damage_dealt: hits.iter().filter(|h| h.accepted).map(|h| u64::from(h.amount)).sum(),
        health_lost: table.total_lost(),
        vehicle_tier: car.damage_model().visual_tier(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub status: ReportStatus,
    pub hits_applied: usize,
    pub hits_ignored: usize,
    pub damage_dealt: u64,
    pub health_lost: i64,
    pub vehicle_tier: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Intact,
    Damaged,
    Destroyed,
}

/// One resolved hit. `accepted` is false when the car was already a wreck.
#[derive(Debug, Clone, Serialize)]
pub struct HitRecord {
    pub index: usize,
    pub damage_type: DamageType,
    pub angle: f32,
    pub quadrant: Quadrant,
    pub amount: u32,
    pub accepted: bool,
    pub target: SystemType,
    pub effects: Vec<DamageEffect>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemRecord {
    pub system: SystemType,
    pub start: i32,
    pub current: i32,
    pub tier: usize,
}

impl SystemRecord {
    pub fn collect(car: &Car) -> Vec<Self> {
        car.damage_model()
            .table()
            .iter()
            .map(|(system, current, start)| SystemRecord {
                system,
                start,
                current,
                tier: car.health_group(system),
            })
            .collect()
    }
}

/// The parts of a saved report the CLI reads back.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedReport {
    pub id: String,
    pub timestamp: String,
    pub vehicle: String,
    pub seed: u64,
    pub summary: ReportSummary,
    #[serde(default)]
    pub systems: Vec<SystemRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_combat::VehicleDefinition;

    #[test]
    fn untouched_car_is_intact() {
        let car = Car::configure(&VehicleDefinition::default());
        let report = SimulationReport::new("r", 1, &car, Vec::new());
        assert_eq!(ReportStatus::Intact, report.summary.status);
        assert_eq!(16, report.systems.len());
        assert!(report.explosion.is_none());
    }

    #[test]
    fn killed_car_reports_destroyed() {
        let mut car = Car::configure(&VehicleDefinition::default());
        car.kill();
        let report = SimulationReport::new("r", 1, &car, Vec::new());
        assert!(report.destroyed());
        assert!(report.explosion.is_some());
    }

    #[test]
    fn saved_report_reads_back_header() {
        let mut car = Car::configure(&VehicleDefinition::default());
        car.kill();
        let report = SimulationReport::new("r-7", 7, &car, Vec::new());
        let json = serde_json::to_string(&report).unwrap();
        let saved: SavedReport = serde_json::from_str(&json).unwrap();
        assert_eq!("r-7", saved.id);
        assert_eq!(ReportStatus::Destroyed, saved.summary.status);
        assert_eq!(report.systems, saved.systems);
    }
}
