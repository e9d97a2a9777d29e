//! Headless scenario runner.
//!
//! ```text
//! tempest_harness scenarios/three_way.toml --config tempest.toml -vv
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tempest::{Scenario, Simulation, SimulationConfig, SimulationResult};
use tempest_shared::ManualClock;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Run a TEMPEST scenario and print what happened.
#[derive(Parser, Debug)]
#[command(name = "tempest_harness", version, about)]
struct Cli {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Simulation config file (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the particle RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print every hazard event after the summary
    #[arg(long)]
    events: bool,

    /// Drive tick rates, scan throttles and lifespans from the wall clock
    /// instead of simulated frame time
    #[arg(long)]
    wall_clock: bool,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress everything except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn run(cli: &Cli) -> SimulationResult<()> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.particles.seed = seed;
    }

    let scenario = Scenario::load(&cli.scenario)?;
    let report = if cli.wall_clock {
        let mut sim = Simulation::new(&config)?;
        scenario.run(&mut sim)?
    } else {
        let clock = ManualClock::new(0);
        let mut sim = Simulation::with_clock(&config, clock.clone())?;
        scenario.run_simulated(&mut sim, &clock)?
    };

    println!("{report}");
    if cli.events {
        for event in &report.events {
            println!("  {event:?}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
