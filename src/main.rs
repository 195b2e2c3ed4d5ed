mod board;
mod config;
mod deadlock;
mod engine;
mod error;
mod frontier;
mod heuristic;
mod hungarian;
mod level;
mod result;
mod state;
mod zobrist;

use clap::Parser;
use config::Config;
use engine::SearchEngine;
use error::SolverError;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sokosolve")]
#[command(about = "A Sokoban puzzle solver", long_about = None)]
struct Args {
    /// Path to the JSON run configuration
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args.config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config_path: &Path) -> Result<(), SolverError> {
    let config = Config::from_file(config_path)?;

    info!("loading level {}", config.map_name.display());
    let initial = level::load_file(&config.map_name)?;

    let engine = SearchEngine::new(config.algorithm, config.heuristic, config.pruning)?;
    match config.heuristic {
        Some(h) => info!("starting {} search with {} heuristic", config.algorithm, h),
        None => info!("starting {} search", config.algorithm),
    }

    let result = engine.search(initial);
    println!("{}", result);

    if result.is_solved() {
        let written = result.write_reports(config.output_file.as_deref(), config.generate_animation)?;
        for path in written {
            info!("wrote {}", path.display());
        }
    }

    Ok(())
}
