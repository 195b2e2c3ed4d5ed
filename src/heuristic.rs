use crate::board::{MAX_BOXES, Position};
use crate::deadlock;
use crate::error::SolverError;
use crate::hungarian::{ArrayMatrix, hungarian_algorithm};
use crate::state::State;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Estimated cost of reaching a goal configuration.
///
/// Real-valued because the composite heuristic carries an L2 player term;
/// `INFINITE` marks states proven unsolvable. Totally ordered via
/// `f64::total_cmp` so it can key frontier heaps directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost(f64);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);
    pub const INFINITE: Cost = Cost(f64::INFINITY);

    pub fn new(value: f64) -> Cost {
        debug_assert!(value >= 0.0);
        Cost(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    /// `f = g + h` for a node `g` edges deep.
    pub fn plus_depth(self, g: u32) -> Cost {
        Cost(self.0 + g as f64)
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// The informed-distance estimators. All are stateless, read-only over the
/// state, and return zero for a solved position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Sum over boxes of the L1 distance to the nearest goal. Admissible.
    Manhattan,
    /// Manhattan, amplified to infinity when a box is statically dead
    /// (corner or frozen 2x2). Doubles as a hard reject.
    Deadlock,
    /// One-to-one matching built greedily: repeatedly pair the closest
    /// remaining box and goal under L1. Cheaper than the optimal matching
    /// but not admissible in general.
    GreedyMatch,
    /// Minimum-cost perfect matching of off-goal boxes to goals under L1
    /// (Hungarian algorithm). Admissible.
    PerfectMatch,
    /// PerfectMatch plus the L2 distance from the player to the nearest
    /// off-goal box. Informed but not admissible.
    SumOfDistance,
}

impl Heuristic {
    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "MANHATTAN",
            Heuristic::Deadlock => "DEADLOCK",
            Heuristic::GreedyMatch => "GREEDY_MATCH",
            Heuristic::PerfectMatch => "PERFECTMATCH",
            Heuristic::SumOfDistance => "SUM_OF_DISTANCE",
        }
    }

    pub fn estimate(self, state: &State) -> Cost {
        match self {
            Heuristic::Manhattan => manhattan(state),
            Heuristic::Deadlock => deadlock_amplified(state),
            Heuristic::GreedyMatch => Cost::new(greedy_match_cost(state) as f64),
            Heuristic::PerfectMatch => Cost::new(matching_cost(state) as f64),
            Heuristic::SumOfDistance => sum_of_distance(state),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Heuristic {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('_', "").as_str() {
            "MANHATTAN" => Ok(Heuristic::Manhattan),
            "DEADLOCK" => Ok(Heuristic::Deadlock),
            "GREEDYMATCH" => Ok(Heuristic::GreedyMatch),
            "PERFECTMATCH" => Ok(Heuristic::PerfectMatch),
            "SUMOFDISTANCE" => Ok(Heuristic::SumOfDistance),
            _ => Err(SolverError::InvalidConfig(format!(
                "unknown heuristic: {}",
                s
            ))),
        }
    }
}

fn manhattan(state: &State) -> Cost {
    let goals = state.board().goals();
    let total: u32 = state
        .boxes()
        .iter()
        .map(|&b| {
            goals
                .iter()
                .map(|&g| b.manhattan(g) as u32)
                .min()
                .expect("board has at least one goal")
        })
        .sum();
    Cost::new(total as f64)
}

fn deadlock_amplified(state: &State) -> Cost {
    let dead = state
        .boxes()
        .iter()
        .any(|&b| deadlock::is_static_deadlock(b, state.boxes(), state.board()));
    if dead {
        Cost::INFINITE
    } else {
        manhattan(state)
    }
}

/// Greedy one-to-one matching over the full box x goal distance matrix:
/// walk all pairs in ascending distance order, committing each pair whose
/// box and goal are both still free.
fn greedy_match_cost(state: &State) -> u32 {
    let goals = state.board().goals();
    let boxes = state.boxes();

    let mut pairs: Vec<(u16, usize, usize)> = Vec::with_capacity(boxes.len() * goals.len());
    for (b, &box_pos) in boxes.iter().enumerate() {
        for (g, &goal_pos) in goals.iter().enumerate() {
            pairs.push((box_pos.manhattan(goal_pos), b, g));
        }
    }
    // Stable sort keeps equal distances in generation order
    pairs.sort_by_key(|&(distance, _, _)| distance);

    let mut matched_boxes = 0u64;
    let mut matched_goals = 0u64;
    let mut total = 0u32;
    for (distance, b, g) in pairs {
        if matched_boxes & (1u64 << b) == 0 && matched_goals & (1u64 << g) == 0 {
            total += distance as u32;
            matched_boxes |= 1u64 << b;
            matched_goals |= 1u64 << g;
        }
    }
    total
}

/// Hungarian matching cost of off-goal boxes against all goals.
fn matching_cost(state: &State) -> u16 {
    let board = state.board();
    let unmatched: Vec<Position> = state
        .boxes()
        .iter()
        .copied()
        .filter(|&b| !board.is_goal(b))
        .collect();
    if unmatched.is_empty() {
        return 0;
    }

    let goals = board.goals();
    let mut matrix = ArrayMatrix::<u16, { MAX_BOXES * MAX_BOXES }>::new(unmatched.len(), goals.len());
    for &b in &unmatched {
        for &g in goals {
            matrix.push(b.manhattan(g));
        }
    }

    hungarian_algorithm(&matrix)
}

fn sum_of_distance(state: &State) -> Cost {
    let board = state.board();
    let player_term = state
        .boxes()
        .iter()
        .copied()
        .filter(|&b| !board.is_goal(b))
        .map(|b| state.player().euclidean(b))
        .fold(f64::INFINITY, f64::min);
    let player_term = if player_term.is_finite() {
        player_term
    } else {
        0.0
    };

    Cost::new(player_term + matching_cost(state) as f64)
}
