//! Snakes - runs the simulation in the terminal.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use snakes_engine::{Simulation, SimulationConfig};
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "snakes")]
#[command(author, version, about = "Snakes hunting for food on a grid", long_about = None)]
struct Cli {
    /// Number of cells along the x axis
    #[arg(long, default_value = "40")]
    width: usize,

    /// Number of cells along the y axis
    #[arg(long, default_value = "40")]
    height: usize,

    /// Ticks per second
    #[arg(long, default_value = "100")]
    frame_rate: u32,

    /// Seed for the random number generator
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Number of ticks to run (default: run until interrupted)
    #[arg(short, long)]
    ticks: Option<usize>,

    /// World as layout text, replacing the initial snake and the grid size
    #[arg(short, long)]
    layout: Option<String>,

    /// Print the replay as JSON once finished
    #[arg(long)]
    replay: bool,

    /// Do not draw the world
    #[arg(short, long)]
    quiet: bool,
}

// Logs go to stderr so they do not mix with the rendered frames
fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("Failed to install the log subscriber: {}", error))
}

fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = SimulationConfig {
        width: cli.width,
        height: cli.height,
        frame_rate: cli.frame_rate,
        seed: cli.seed,
        record_replay: cli.replay,
    };

    let mut simulation = match &cli.layout {
        Some(layout) => Simulation::from_layout(layout, config)
            .context("Failed to build the simulation from the layout")?,
        None => Simulation::with_initial_snake(config).context("Failed to build the simulation")?,
    };
    info!(
        width = simulation.width(),
        height = simulation.height(),
        snakes = simulation.snakes().len(),
        "simulation started"
    );

    let interval = Duration::from_millis(simulation.config().tick_interval_ms());
    while cli.ticks.map_or(true, |ticks| simulation.turn() < ticks) {
        simulation.tick();

        if !cli.quiet {
            simulation.draw().context("Failed to draw the simulation")?;
        }
        thread::sleep(interval);
    }

    info!(
        turn = simulation.turn(),
        snakes = simulation.snakes().len(),
        "simulation finished"
    );

    if let Some(replay) = simulation.replay() {
        println!("{}", serde_json::to_string(&replay)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_the_log_subscriber_is_already_installed_an_error_is_returned() {
        assert!(init_tracing().is_ok());
        assert!(init_tracing().is_err());
    }
}
