use crate::board::Action;
use crate::error::SolverError;
use crate::frontier::{Algorithm, Frontier};
use crate::heuristic::Heuristic;
use crate::result::{Metrics, SearchResult};
use crate::state::State;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

type NodeId = usize;

/// A search-tree node. Nodes live in an arena owned by one `search` call
/// and reference their parents by index, forming a reverse tree that is
/// only walked during path reconstruction.
struct Node {
    state: State,
    parent: Option<NodeId>,
    action: Action,
    g: u32,
}

/// Orchestrates a graph search over Sokoban states using a frontier
/// strategy and an optional heuristic.
pub struct SearchEngine {
    algorithm: Algorithm,
    heuristic: Option<Heuristic>,
    pruning: bool,
}

impl SearchEngine {
    /// Rejects mismatched strategy/heuristic combinations up front: the
    /// informed strategies require a heuristic, the uninformed ones refuse
    /// one.
    pub fn new(
        algorithm: Algorithm,
        heuristic: Option<Heuristic>,
        pruning: bool,
    ) -> Result<Self, SolverError> {
        match (algorithm.needs_heuristic(), heuristic) {
            (true, None) => Err(SolverError::InvalidConfig(format!(
                "{} requires a heuristic",
                algorithm
            ))),
            (false, Some(h)) => Err(SolverError::InvalidConfig(format!(
                "{} does not take a heuristic (got {})",
                algorithm, h
            ))),
            _ => Ok(SearchEngine {
                algorithm,
                heuristic,
                pruning,
            }),
        }
    }

    pub fn search(&self, initial: State) -> SearchResult {
        let run = SearchRun {
            heuristic: self.heuristic,
            pruning: self.pruning,
            algorithm: self.algorithm,
            arena: Vec::new(),
            frontier: Frontier::new(self.algorithm),
            nodes_expanded: 0,
            max_frontier_size: 0,
            started: Instant::now(),
        };
        run.execute(initial)
    }
}

struct SearchRun {
    algorithm: Algorithm,
    heuristic: Option<Heuristic>,
    pruning: bool,
    arena: Vec<Node>,
    frontier: Frontier<NodeId>,
    nodes_expanded: usize,
    max_frontier_size: usize,
    started: Instant,
}

impl SearchRun {
    fn execute(mut self, initial: State) -> SearchResult {
        let root = self.add_node(initial.clone(), None, Action::Start, 0);
        if self.arena[root].state.is_goal() {
            return self.success(root);
        }

        if self.algorithm.cache_cost() {
            self.run_cost_caching(initial, root)
        } else {
            self.run_plain(initial, root)
        }
    }

    /// Plain discipline: each state is closed the moment it is generated,
    /// so it enters the frontier at most once.
    fn run_plain(&mut self, initial: State, root: NodeId) -> SearchResult {
        let mut closed: HashSet<State> = HashSet::new();
        closed.insert(initial);
        self.push_node(root);

        while let Some(id) = self.frontier.pop() {
            if self.arena[id].state.is_goal() {
                return self.take_success(id);
            }
            self.nodes_expanded += 1;

            let successors = self.arena[id].state.successors(self.pruning);
            let g = self.arena[id].g + 1;
            for (state, dir) in successors {
                if closed.contains(&state) {
                    continue;
                }
                closed.insert(state.clone());
                let child = self.add_node(state, Some(id), Action::Move(dir), g);
                self.push_node(child);
            }
        }

        self.take_failure()
    }

    /// Cost-caching discipline: a state may re-enter the frontier whenever
    /// a strictly cheaper path to it is found; stale entries are discarded
    /// on pop by comparing against the best-known cost.
    fn run_cost_caching(&mut self, initial: State, root: NodeId) -> SearchResult {
        let mut best: HashMap<State, u32> = HashMap::new();
        let mut closed: HashSet<State> = HashSet::new();
        best.insert(initial, 0);
        self.push_node(root);

        while let Some(id) = self.frontier.pop() {
            let stale = best
                .get(&self.arena[id].state)
                .is_some_and(|&b| self.arena[id].g > b);
            if stale {
                continue;
            }

            closed.insert(self.arena[id].state.clone());
            // Goal test on pop: a node popped from an (f, h, tick) frontier
            // is optimal only once its key is minimal
            if self.arena[id].state.is_goal() {
                return self.take_success(id);
            }
            self.nodes_expanded += 1;

            let successors = self.arena[id].state.successors(self.pruning);
            let g = self.arena[id].g + 1;
            for (state, dir) in successors {
                if best.get(&state).is_some_and(|&b| g >= b) {
                    continue;
                }
                best.insert(state.clone(), g);
                closed.remove(&state);
                let child = self.add_node(state, Some(id), Action::Move(dir), g);
                self.push_node(child);
            }
        }

        self.take_failure()
    }

    fn add_node(&mut self, state: State, parent: Option<NodeId>, action: Action, g: u32) -> NodeId {
        self.arena.push(Node {
            state,
            parent,
            action,
            g,
        });
        self.arena.len() - 1
    }

    fn push_node(&mut self, id: NodeId) {
        let h = self
            .heuristic
            .map(|heuristic| heuristic.estimate(&self.arena[id].state));
        self.frontier.push(id, self.arena[id].g, h);
        self.max_frontier_size = self.max_frontier_size.max(self.frontier.len());
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            nodes_expanded: self.nodes_expanded,
            max_frontier_size: self.max_frontier_size,
            elapsed: self.started.elapsed(),
        }
    }

    fn take_success(&mut self, goal: NodeId) -> SearchResult {
        debug!(
            "{}: solved after {} expansions ({} nodes allocated)",
            self.algorithm,
            self.nodes_expanded,
            self.arena.len()
        );
        self.success(goal)
    }

    fn success(&self, goal: NodeId) -> SearchResult {
        let mut states = Vec::new();
        let mut actions = Vec::new();
        let mut current = Some(goal);
        while let Some(id) = current {
            let node = &self.arena[id];
            states.push(node.state.clone());
            actions.push(node.action);
            current = node.parent;
        }
        states.reverse();
        actions.reverse();
        SearchResult::solved(states, actions, self.metrics(), self.algorithm)
    }

    fn take_failure(&self) -> SearchResult {
        debug!(
            "{}: frontier exhausted after {} expansions",
            self.algorithm, self.nodes_expanded
        );
        SearchResult::exhausted(self.metrics(), self.algorithm)
    }
}
