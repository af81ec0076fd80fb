//! `ai-sim` - run platformer enemy scenarios without a game engine.
//!
//! - `ai-sim run <scenario>` - simulate and print a summary
//! - `ai-sim check <scenario>` - validate a scenario file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ai_sim::{Scenario, Simulation};

#[derive(Parser)]
#[command(name = "ai-sim")]
#[command(about = "Headless runner for platformer enemy scenarios", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scenario and print a summary
    Run {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Number of fixed steps to simulate
        #[arg(long, default_value_t = 600)]
        ticks: u64,

        /// Step length in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a scenario without running it
    Check {
        /// Scenario YAML file
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            ticks,
            dt,
            json,
        } => run_scenario(&scenario, ticks, dt, json),
        Commands::Check { scenario } => check_scenario(&scenario),
    }
}

fn run_scenario(path: &Path, ticks: u64, dt: f32, json: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let mut sim = Simulation::new(&scenario, dt)
        .with_context(|| format!("Invalid scenario {}", path.display()))?;

    tracing::info!(ticks, dt, "running");
    let summary = sim.run(ticks)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn check_scenario(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    scenario
        .validate()
        .with_context(|| format!("Invalid scenario {}", path.display()))?;

    let (width, height) = scenario.level()?.dimensions();
    println!("{}: ok", path.display());
    println!("  level: {width}x{height} tiles of {}", scenario.tile_size);
    println!("  agents: {}", scenario.agents.len());
    for agent in &scenario.agents {
        println!(
            "    - {} at ({}, {}) facing {:?}",
            agent.archetype.name(),
            agent.position.x,
            agent.position.y,
            agent.direction
        );
    }
    println!("  events: {}", scenario.events.len());
    Ok(())
}
