//! Homestead - headless runner
//!
//! Runs the economy for a fixed number of frames, prints a summary, and
//! writes the analytics history on shutdown.

use std::path::PathBuf;

use clap::Parser;
use homestead::core::error::Result;
use homestead::core::SimulationConfig;
use homestead::entity::AgentRole;
use homestead::simulation::{Simulation, SimulationEvent};
use tracing_subscriber::EnvFilter;

/// Run the foraging economy headless
#[derive(Parser, Debug)]
#[command(name = "homestead")]
#[command(about = "Simulate foragers founding and feeding settlements")]
struct Args {
    /// TOML config file; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducible runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Initial agent count (overrides the config)
    #[arg(long)]
    agents: Option<usize>,

    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// CSV file for the analytics history
    #[arg(long, default_value = "sim_analytics.csv")]
    output: PathBuf,

    /// Also write the history as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("homestead=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(agents) = args.agents {
        config.population.initial_agents = agents;
    }

    let mut sim = Simulation::new(config)?;

    let mut founded = 0usize;
    let mut deaths = 0usize;
    let mut deposits = 0usize;
    let mut first_founding = None;
    let mut longest_trek = 0usize;
    for _ in 0..args.frames {
        for event in sim.advance_frame(args.dt)? {
            match &event {
                SimulationEvent::SettlementFounded { .. } => {
                    founded += 1;
                    first_founding.get_or_insert(event.tick());
                }
                SimulationEvent::AgentDied { .. } => deaths += 1,
                SimulationEvent::Deposited { .. } => deposits += 1,
                SimulationEvent::BecamePioneer { agent, target, .. } => {
                    if let Some(pioneer) = sim.agent(*agent) {
                        longest_trek = longest_trek.max(pioneer.cell().chebyshev(target));
                    }
                }
            }
        }
        if sim.population() == 0 {
            tracing::info!(frame = sim.frame(), "Population died out");
            break;
        }
    }

    println!("{}", sim.summary());
    println!("{founded} settlements founded, {deposits} deposits, {deaths} deaths");
    if let Some(tick) = first_founding {
        println!("first settlement at frame {tick}, longest pioneer trek {longest_trek} cells");
    }

    let roles = sim.view().role_counts();
    let count = |role| roles.get(&role).copied().unwrap_or(0);
    println!(
        "roles: {} foragers, {} pioneers, {} residents",
        count(AgentRole::Forager),
        count(AgentRole::Pioneer),
        count(AgentRole::Resident)
    );
    for settlement in sim.settlements() {
        println!(
            "settlement {} at ({}, {}): {} food from {} deposits, {} residents",
            settlement.id.0,
            settlement.position.x,
            settlement.position.y,
            settlement.stockpile_amount(),
            settlement.stockpile.deposit_count(),
            settlement.resident_count
        );
    }

    sim.shutdown(&args.output)?;
    if let Some(path) = &args.json {
        std::fs::write(path, sim.history().to_json()?)?;
        tracing::info!(path = %path.display(), "History written as JSON");
    }

    Ok(())
}
