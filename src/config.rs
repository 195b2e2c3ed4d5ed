use crate::error::SolverError;
use crate::frontier::Algorithm;
use crate::heuristic::Heuristic;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A fully resolved run configuration.
#[derive(Debug)]
pub struct Config {
    pub algorithm: Algorithm,
    pub heuristic: Option<Heuristic>,
    pub map_name: PathBuf,
    pub output_file: Option<String>,
    pub generate_animation: bool,
    pub pruning: bool,
}

/// The raw JSON document. Unknown keys are ignored; names are resolved
/// case-insensitively after parsing.
#[derive(Debug, Deserialize)]
struct RawConfig {
    algorithm: Option<String>,
    heuristic: Option<String>,
    map_name: Option<String>,
    output_file: Option<String>,
    #[serde(default)]
    generate_animation: bool,
    #[serde(default)]
    pruning: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, SolverError> {
        if !path.exists() {
            return Err(SolverError::InvalidConfig(format!(
                "configuration file '{}' not found",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path)?;
        Config::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Config, SolverError> {
        let raw: RawConfig = serde_json::from_str(contents)?;

        let algorithm = raw.algorithm.as_deref().unwrap_or("BFS").parse()?;
        let heuristic = match raw.heuristic.as_deref() {
            Some(name) => Some(name.parse::<Heuristic>()?),
            None => None,
        };
        let map_name = raw
            .map_name
            .ok_or_else(|| SolverError::InvalidConfig("missing map_name".to_string()))?;

        Ok(Config {
            algorithm,
            heuristic,
            map_name: PathBuf::from(map_name),
            output_file: raw.output_file,
            generate_animation: raw.generate_animation,
            pruning: raw.pruning,
        })
    }
}
