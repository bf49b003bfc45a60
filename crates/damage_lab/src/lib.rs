pub mod report;
pub mod runner;
pub mod scenario;

pub use report::{
    HitRecord, ReportStatus, ReportSummary, SavedReport, SimulationReport, SystemRecord,
};
pub use runner::{run_hits, run_scenario, sweep, RunOptions, DEFAULT_SEED};
pub use scenario::{ReportConfig, ScenarioConfig, ScenarioError, ScriptedHit};
