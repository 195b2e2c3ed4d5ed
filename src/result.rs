use crate::board::Action;
use crate::error::SolverError;
use crate::frontier::Algorithm;
use crate::state::State;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Bookkeeping gathered over one `search` call.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    /// Number of nodes whose successors were generated.
    pub nodes_expanded: usize,
    /// Largest frontier size observed, sampled after every push.
    pub max_frontier_size: usize,
    /// Wall-clock time from search start to return.
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum Outcome {
    /// A path from the initial state to a goal state. `states` and
    /// `actions` are parallel; `actions[0]` is `START`.
    Solved {
        states: Vec<State>,
        actions: Vec<Action>,
    },
    /// The frontier ran dry: no solution exists within the reachable
    /// state space.
    Exhausted,
}

#[derive(Debug)]
pub struct SearchResult {
    pub outcome: Outcome,
    pub metrics: Metrics,
    pub algorithm: Algorithm,
}

#[derive(Serialize)]
struct MetricsReport<'a> {
    algorithm: &'a str,
    success: bool,
    cost: u32,
    path_length: usize,
    metrics: MetricsBody,
}

#[derive(Serialize)]
struct MetricsBody {
    nodes_expanded: usize,
    max_frontier_size: usize,
    processing_time_seconds: f64,
}

impl SearchResult {
    pub fn solved(
        states: Vec<State>,
        actions: Vec<Action>,
        metrics: Metrics,
        algorithm: Algorithm,
    ) -> Self {
        debug_assert_eq!(states.len(), actions.len());
        debug_assert_eq!(actions.first(), Some(&Action::Start));
        SearchResult {
            outcome: Outcome::Solved { states, actions },
            metrics,
            algorithm,
        }
    }

    pub fn exhausted(metrics: Metrics, algorithm: Algorithm) -> Self {
        SearchResult {
            outcome: Outcome::Exhausted,
            metrics,
            algorithm,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, Outcome::Solved { .. })
    }

    /// Number of edges on the solution path, if one was found.
    pub fn cost(&self) -> Option<u32> {
        match &self.outcome {
            Outcome::Solved { states, .. } => Some(states.len() as u32 - 1),
            Outcome::Exhausted => None,
        }
    }

    fn rounded_seconds(&self) -> f64 {
        (self.metrics.elapsed.as_secs_f64() * 10_000.0).round() / 10_000.0
    }

    /// Write the metrics JSON (and optionally the animation CSV) under
    /// `output/`, with a Unix timestamp appended to the base name.
    /// Returns the paths written. Only meaningful for solved runs.
    pub fn write_reports(
        &self,
        base_name: Option<&str>,
        animation: bool,
    ) -> Result<Vec<PathBuf>, SolverError> {
        let Outcome::Solved { states, actions } = &self.outcome else {
            return Err(SolverError::InvalidConfig(
                "cannot export an unsolved search".to_string(),
            ));
        };

        fs::create_dir_all("output")?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let stem = format!("{}_{}", base_name.unwrap_or("result"), timestamp);

        let metrics_path = PathBuf::from(format!("output/metrics_{}.json", stem));
        let report = MetricsReport {
            algorithm: self.algorithm.name(),
            success: true,
            cost: self.cost().unwrap(),
            path_length: states.len(),
            metrics: MetricsBody {
                nodes_expanded: self.metrics.nodes_expanded,
                max_frontier_size: self.metrics.max_frontier_size,
                processing_time_seconds: self.rounded_seconds(),
            },
        };
        fs::write(&metrics_path, serde_json::to_string_pretty(&report)?)?;

        let mut written = vec![metrics_path];
        if animation {
            let animation_path = PathBuf::from(format!("output/animation_{}.csv", stem));
            let mut file = fs::File::create(&animation_path)?;
            write_animation(&mut file, states, actions)?;
            written.push(animation_path);
        }
        Ok(written)
    }
}

/// One CSV row per state on the path. Position fields contain commas, so
/// they are quoted; box positions are already lexicographically sorted
/// within each state.
fn write_animation(
    out: &mut impl Write,
    states: &[State],
    actions: &[Action],
) -> Result<(), SolverError> {
    writeln!(out, "step,player_pos,boxes_pos,action")?;
    for (step, (state, action)) in states.iter().zip(actions.iter()).enumerate() {
        let boxes = state
            .boxes()
            .iter()
            .map(|pos| pos.to_string())
            .collect::<Vec<_>>()
            .join(";");
        writeln!(
            out,
            "{},\"{}\",\"{}\",{}",
            step,
            state.player(),
            boxes,
            action
        )?;
    }
    Ok(())
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} Search Result ===", self.algorithm)?;
        writeln!(f, "Success: {}", self.is_solved())?;
        match &self.outcome {
            Outcome::Solved { states, .. } => {
                writeln!(f, "Solution cost: {}", self.cost().unwrap())?;
                writeln!(f, "Path length: {} states", states.len())?;
            }
            Outcome::Exhausted => writeln!(f, "No solution found.")?,
        }
        writeln!(f, "Nodes expanded: {}", self.metrics.nodes_expanded)?;
        writeln!(f, "Max frontier size: {}", self.metrics.max_frontier_size)?;
        write!(
            f,
            "Processing time: {:.4} seconds",
            self.metrics.elapsed.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SearchEngine;
    use crate::level;

    fn solved_result() -> SearchResult {
        let state = level::parse("#####\n#@$.#\n#####").unwrap();
        SearchEngine::new(Algorithm::Bfs, None, false)
            .unwrap()
            .search(state)
    }

    #[test]
    fn test_metrics_json_shape() {
        let result = solved_result();
        let Outcome::Solved { states, .. } = &result.outcome else {
            panic!()
        };
        let report = MetricsReport {
            algorithm: result.algorithm.name(),
            success: true,
            cost: result.cost().unwrap(),
            path_length: states.len(),
            metrics: MetricsBody {
                nodes_expanded: result.metrics.nodes_expanded,
                max_frontier_size: result.metrics.max_frontier_size,
                processing_time_seconds: result.rounded_seconds(),
            },
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        assert_eq!(value["algorithm"], "BFS");
        assert_eq!(value["success"], true);
        assert_eq!(value["cost"], 1);
        assert_eq!(value["path_length"], 2);
        assert!(value["metrics"]["nodes_expanded"].is_u64());
        assert!(value["metrics"]["processing_time_seconds"].is_f64() || value["metrics"]["processing_time_seconds"].is_u64());
    }

    #[test]
    fn test_animation_rows() {
        let result = solved_result();
        let Outcome::Solved { states, actions } = &result.outcome else {
            panic!()
        };
        let mut buffer = Vec::new();
        write_animation(&mut buffer, states, actions).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "step,player_pos,boxes_pos,action");
        assert_eq!(lines[1], "0,\"(1,1)\",\"(1,2)\",START");
        assert_eq!(lines[2], "1,\"(1,2)\",\"(1,3)\",RIGHT");
        assert_eq!(lines.len(), states.len() + 1);
    }

    #[test]
    fn test_animation_boxes_sorted() {
        let state = level::parse("#####\n#@$.#\n# $.#\n#####").unwrap();
        let result = SearchEngine::new(Algorithm::Bfs, None, false)
            .unwrap()
            .search(state);
        let Outcome::Solved { states, actions } = &result.outcome else {
            panic!()
        };
        let mut buffer = Vec::new();
        write_animation(&mut buffer, states, actions).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        for line in text.lines().skip(1) {
            let boxes_field = line.split('"').nth(3).unwrap();
            let positions: Vec<&str> = boxes_field.split(';').collect();
            let mut sorted = positions.clone();
            sorted.sort();
            assert_eq!(positions, sorted);
        }
    }

    #[test]
    fn test_export_refused_for_failure() {
        let state = level::parse("####\n#$ #\n#@.#\n####").unwrap();
        let result = SearchEngine::new(Algorithm::Bfs, None, false)
            .unwrap()
            .search(state);
        assert!(!result.is_solved());
        assert!(result.write_reports(Some("x"), false).is_err());
    }

    #[test]
    fn test_summary_formats() {
        let result = solved_result();
        let summary = result.to_string();
        assert!(summary.contains("=== BFS Search Result ==="));
        assert!(summary.contains("Success: true"));
        assert!(summary.contains("Solution cost: 1"));
        assert!(summary.contains("Nodes expanded:"));
    }
}
