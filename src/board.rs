use crate::zobrist::Zobrist;
use std::fmt;

pub const MAX_SIZE: usize = 64;
pub const MAX_BOXES: usize = 64;

/// A `(row, col)` grid coordinate. Derived `Ord` gives the lexicographic
/// order used wherever positions need a canonical sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(pub i16, pub i16);

impl Position {
    pub fn step(self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position(self.0 + dr, self.1 + dc)
    }

    /// L1 distance.
    pub fn manhattan(self, other: Position) -> u16 {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    /// L2 distance.
    pub fn euclidean(self, other: Position) -> f64 {
        let dr = (self.0 - other.0) as f64;
        let dc = (self.1 - other.1) as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Successors are always generated in this order so that tie-breaking is
/// deterministic across strategies.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The two walking directions along a wall the box is flush against.
    pub fn perpendicular(self) -> (Direction, Direction) {
        match self {
            Direction::Up | Direction::Down => (Direction::Left, Direction::Right),
            Direction::Left | Direction::Right => (Direction::Up, Direction::Down),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Left => write!(f, "LEFT"),
            Direction::Right => write!(f, "RIGHT"),
        }
    }
}

/// A step on a solution path. The root of a search carries `Start`; every
/// other node records the direction the player moved, whether or not the
/// move pushed a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Move(Direction),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start => write!(f, "START"),
            Action::Move(dir) => write!(f, "{}", dir),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Floor,
    Goal,
}

/// The static half of a puzzle: walls and goals.
///
/// A `Board` is immutable after construction and shared by reference
/// (`Arc`) across every state of one search, so it also carries the
/// per-puzzle precomputations: the Zobrist tables and the dead-end aisle
/// cells used by the deadlock oracle.
pub struct Board {
    tiles: Vec<Tile>,
    width: i16,
    height: i16,
    goals: Vec<Position>,
    aisle_cells: Vec<bool>,
    zobrist: Zobrist,
}

impl Board {
    pub fn new(width: usize, height: usize, tiles: Vec<Tile>, mut goals: Vec<Position>) -> Self {
        assert!(width <= MAX_SIZE && height <= MAX_SIZE, "board too large");
        assert_eq!(tiles.len(), width * height);
        goals.sort_unstable();

        let mut board = Board {
            tiles,
            width: width as i16,
            height: height as i16,
            goals,
            aisle_cells: Vec::new(),
            zobrist: Zobrist::new(width, height),
        };
        board.aisle_cells = board.compute_aisle_cells();
        board
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.0 >= 0 && pos.1 >= 0 && pos.0 < self.height && pos.1 < self.width
    }

    /// Tile at `pos`; everything outside the grid counts as a wall.
    pub fn tile(&self, pos: Position) -> Tile {
        if self.in_bounds(pos) {
            self.tiles[pos.0 as usize * self.width as usize + pos.1 as usize]
        } else {
            Tile::Wall
        }
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile(pos) == Tile::Wall
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        self.tile(pos) == Tile::Goal
    }

    /// Goal positions in lexicographic order.
    pub fn goals(&self) -> &[Position] {
        &self.goals
    }

    pub fn zobrist(&self) -> &Zobrist {
        &self.zobrist
    }

    /// True if `pos` was marked by the dead-end aisle precomputation: a box
    /// pushed onto such a cell can never leave it.
    pub fn is_aisle_cell(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.aisle_cells[pos.0 as usize * self.width as usize + pos.1 as usize]
    }

    /// Fixed-point computation of dead-end aisle cells: starting from the
    /// walls, repeatedly mark any non-goal floor cell with three or more
    /// blocked neighbours (walls or already-marked cells) until nothing
    /// changes.
    fn compute_aisle_cells(&self) -> Vec<bool> {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut marked = vec![false; w * h];

        let blocked = |marked: &[bool], pos: Position| -> bool {
            if !self.in_bounds(pos) {
                return true;
            }
            self.is_wall(pos) || marked[pos.0 as usize * w + pos.1 as usize]
        };

        let mut changed = true;
        while changed {
            changed = false;
            for r in 0..h {
                for c in 0..w {
                    let pos = Position(r as i16, c as i16);
                    if self.tile(pos) != Tile::Floor || marked[r * w + c] {
                        continue;
                    }
                    let count = ALL_DIRECTIONS
                        .iter()
                        .filter(|dir| blocked(&marked, pos.step(**dir)))
                        .count();
                    if count >= 3 {
                        marked[r * w + c] = true;
                        changed = true;
                    }
                }
            }
        }

        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;

    #[test]
    fn test_position_ordering() {
        assert!(Position(0, 5) < Position(1, 0));
        assert!(Position(2, 1) < Position(2, 3));
        assert_eq!(Position(4, 4), Position(4, 4));
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let state = level::parse("####\n#@$#\n#.##\n####").unwrap();
        let board = state.board();
        assert!(board.is_wall(Position(-1, 0)));
        assert!(board.is_wall(Position(0, 99)));
        assert!(!board.is_wall(Position(1, 1)));
    }

    #[test]
    fn test_goals_sorted() {
        let state = level::parse("#####\n#.$@#\n#$..#\n#$ .#\n#####").unwrap();
        let goals = state.board().goals();
        assert!(goals.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(goals.len(), 4);
    }

    #[test]
    fn test_aisle_cells_marked_to_fixed_point() {
        // The three-cell corridor on the right is a dead-end aisle: its end
        // has three wall neighbours, and marking it propagates outward.
        let state = level::parse(
            "#######\n\
             #@$.  #\n\
             ##### #\n\
             ##### #\n\
             #######",
        )
        .unwrap();
        let board = state.board();
        assert!(board.is_aisle_cell(Position(3, 5)));
        assert!(board.is_aisle_cell(Position(2, 5)));
        assert!(board.is_aisle_cell(Position(1, 5)));
        assert!(!board.is_aisle_cell(Position(1, 3)));
    }

    #[test]
    fn test_aisle_cells_stop_at_goals() {
        // Same corridor, but its end is a goal: the goal cell is never
        // marked, and without it the neighbour count stays below three.
        let state = level::parse(
            "#######\n\
             #@$   #\n\
             ##### #\n\
             #####.#\n\
             #######",
        )
        .unwrap();
        let board = state.board();
        assert!(!board.is_aisle_cell(Position(3, 5)));
        assert!(!board.is_aisle_cell(Position(2, 5)));
    }
}
