use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use car_combat::zone::{normal_from_angle, resolve};
use car_combat::{DamageType, Quadrant};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use damage_lab::{run_scenario, sweep, RunOptions, SavedReport, ScenarioConfig, DEFAULT_SEED};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Fire scripted barrages at vehicle definitions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario and emit a JSON report.
    Simulate(SimulateArgs),
    /// Run a scenario's hits against every vehicle definition in a directory.
    Sweep(SweepArgs),
    /// Print which zone each impact angle lands in.
    Zones(ZonesArgs),
    /// Pretty-print an existing report.
    Report(ReportArgs),
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = "assets/scenarios/overflow.toml")]
    scenario: PathBuf,
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct SweepArgs {
    #[arg(long, default_value = "assets/scenarios/overflow.toml")]
    scenario: PathBuf,
    #[arg(long, default_value = "assets/vehicles")]
    vehicles: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct ZonesArgs {
    #[arg(long, default_value_t = 45.0)]
    step: f32,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();
    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate(args) => handle_simulate(args),
        Commands::Sweep(args) => handle_sweep(args),
        Commands::Zones(args) => handle_zones(args),
        Commands::Report(args) => handle_report(args),
    }
}

fn run_id() -> String {
    format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S"))
}

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    let config = ScenarioConfig::from_path(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;
    let options = RunOptions::new(args.id.unwrap_or_else(run_id)).with_seed(args.seed);

    let report = run_scenario(&config, &options)?;
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");

    if let Some(path) = config.report_path() {
        write_report(&path, &json)?;
        info!(target: "damage_cli", path = %path.display(), id = %report.id, "report written");
    }
    Ok(())
}

fn handle_sweep(args: SweepArgs) -> Result<()> {
    let config = ScenarioConfig::from_path(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;
    let seed = args.seed.or(config.seed).unwrap_or(DEFAULT_SEED);
    let reports = sweep(&args.vehicles, &run_id(), &config.hits, seed)
        .with_context(|| format!("sweep over {} failed", args.vehicles.display()))?;
    info!(
        target: "damage_cli",
        vehicles = reports.len(),
        seed,
        "sweep finished"
    );

    println!("{:<16} {:<10} {:>6} {:>8}", "vehicle", "status", "lost", "stage");
    for report in &reports {
        println!(
            "{:<16} {:<10} {:>6} {:>8}",
            report.vehicle,
            format!("{:?}", report.summary.status),
            report.summary.health_lost,
            report.summary.vehicle_tier
        );
    }
    Ok(())
}

fn handle_zones(args: ZonesArgs) -> Result<()> {
    anyhow::ensure!(args.step > 0.0, "step must be positive, got {}", args.step);
    println!("{:>7} {:<6} {:<14} {:<14}", "angle", "zone", "projectile", "force");
    let mut angle = 0.0f32;
    while angle < 360.0 {
        let normal = normal_from_angle(angle);
        println!(
            "{:>7.1} {:<6} {:<14} {:<14}",
            angle,
            format!("{:?}", Quadrant::from_angle(angle)),
            resolve(normal, DamageType::Projectile).label(),
            resolve(normal, DamageType::Force).label()
        );
        angle += args.step;
    }
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let data = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let report: SavedReport = serde_json::from_str(&data)?;
    println!(
        "Report {} ({}) -> {} {:?}, seed {}",
        report.id, report.timestamp, report.vehicle, report.summary.status, report.seed
    );
    for system in &report.systems {
        println!(
            "  {:<14} {:>4}/{:<4} stage {}",
            system.system.label(),
            system.current,
            system.start,
            system.tier
        );
    }
    Ok(())
}

fn write_report(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
