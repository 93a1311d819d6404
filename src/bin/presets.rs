use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sowing_ai::config::{AgentConfig, PRESET_NAMES};
use sowing_ai::errors::ConfigResult;

#[derive(Debug, Parser)]
#[command(name = "presets", about = "Inspect and validate agent configurations")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the built-in presets
    List,
    /// Print a preset as JSON
    Show { preset: String },
    /// Load and validate a JSON configuration file
    Check { path: PathBuf },
}

fn summarize(config: &AgentConfig) {
    let depth = &config.depth;
    println!("{}", config.name);
    println!("  engine:     {:?} (memo pruning: {})", config.engine, config.memo_pruning);
    println!("  evaluator:  {}", config.evaluator.base);
    if let Some(opening) = config.evaluator.opening {
        println!(
            "              {} for the first {} moves",
            opening.heuristic, opening.until_move
        );
    }
    println!(
        "  depth:      first {}, start {}, cap {} ({} for the first {} moves)",
        depth.first_move_depth,
        depth.initial_depth,
        depth.max_depth,
        depth.early_max_depth,
        depth.early_moves
    );
    println!(
        "  timing:     {}ms per move, {}ms buffer, {}ms first move",
        depth.max_time_ms, depth.buffer_time_ms, depth.first_move_time_ms
    );
    println!(
        "  backoff:    {:?} (grow only after full simulation: {})",
        depth.backoff, depth.grow_requires_full_simulation
    );
}

fn main() -> ConfigResult<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::List => {
            for name in PRESET_NAMES {
                println!("{name}");
            }
        }
        Command::Show { preset } => {
            let config = AgentConfig::preset(&preset)?;
            println!("{}", config.to_json_pretty()?);
        }
        Command::Check { path } => {
            let config = AgentConfig::from_path(&path)?;
            log::info!("Loaded {} from {}", config.name, path.display());
            summarize(&config);
        }
    }
    Ok(())
}
