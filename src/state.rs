use crate::board::{ALL_DIRECTIONS, Board, Direction, Position, Tile};
use crate::deadlock;
use arrayvec::ArrayVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An immutable puzzle state: player position plus box positions.
///
/// The box list is kept sorted so that equality is set equality and the
/// rendered order is canonical. Identity (`Eq`/`Hash`) depends only on
/// `(player, boxes)`; the board is shared by reference and contributes
/// nothing to it.
#[derive(Clone)]
pub struct State {
    board: Arc<Board>,
    player: Position,
    boxes: Vec<Position>,
    boxes_hash: u64,
}

impl State {
    pub fn new(board: Arc<Board>, player: Position, mut boxes: Vec<Position>) -> State {
        boxes.sort_unstable();
        let boxes_hash = boxes
            .iter()
            .fold(0u64, |acc, &pos| acc ^ board.zobrist().box_hash(pos));
        State {
            board,
            player,
            boxes,
            boxes_hash,
        }
    }

    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    pub fn player(&self) -> Position {
        self.player
    }

    /// Box positions in lexicographic order.
    pub fn boxes(&self) -> &[Position] {
        &self.boxes
    }

    pub fn has_box_at(&self, pos: Position) -> bool {
        self.boxes.binary_search(&pos).is_ok()
    }

    /// True when every box sits on a goal tile. Box and goal counts are
    /// equal by construction, so this is exactly `boxes == goals`.
    pub fn is_goal(&self) -> bool {
        self.boxes.iter().all(|&pos| self.board.is_goal(pos))
    }

    /// Zobrist hash over `(player, boxes)`.
    pub fn zobrist_hash(&self) -> u64 {
        self.boxes_hash ^ self.board.zobrist().player_hash(self.player)
    }

    /// All states reachable with one player move, paired with the direction
    /// taken, in the fixed order `UP, DOWN, LEFT, RIGHT`.
    ///
    /// A move into a box is a push: it is legal only if the cell beyond the
    /// box is free of walls and boxes. With `pruning` enabled, pushes whose
    /// destination the deadlock oracle rejects are dropped.
    pub fn successors(&self, pruning: bool) -> ArrayVec<(State, Direction), 4> {
        let mut result = ArrayVec::new();

        for dir in ALL_DIRECTIONS {
            let target = self.player.step(dir);
            if self.board.is_wall(target) {
                continue;
            }

            if self.has_box_at(target) {
                // A push: the box moves one cell further in the same direction
                let box_dest = target.step(dir);
                if self.board.is_wall(box_dest) || self.has_box_at(box_dest) {
                    continue;
                }

                let mut boxes = self.boxes.clone();
                let removed = boxes.binary_search(&target).unwrap();
                boxes.remove(removed);
                let inserted = boxes.binary_search(&box_dest).unwrap_err();
                boxes.insert(inserted, box_dest);

                if pruning && deadlock::is_deadlock(box_dest, &boxes, &self.board) {
                    continue;
                }

                let boxes_hash = self.boxes_hash
                    ^ self.board.zobrist().box_hash(target)
                    ^ self.board.zobrist().box_hash(box_dest);
                result.push((
                    State {
                        board: self.board.clone(),
                        player: target,
                        boxes,
                        boxes_hash,
                    },
                    dir,
                ));
            } else {
                result.push((
                    State {
                        board: self.board.clone(),
                        player: target,
                        boxes: self.boxes.clone(),
                        boxes_hash: self.boxes_hash,
                    },
                    dir,
                ));
            }
        }

        result
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.player == other.player && self.boxes == other.boxes
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.zobrist_hash());
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("player", &self.player)
            .field("boxes", &self.boxes)
            .finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.board.height() {
            let mut line = String::new();
            for c in 0..self.board.width() {
                let pos = Position(r, c);
                let tile = self.board.tile(pos);

                let ch = if pos == self.player {
                    match tile {
                        Tile::Goal => '+',
                        _ => '@',
                    }
                } else if self.has_box_at(pos) {
                    match tile {
                        Tile::Goal => '*',
                        _ => '$',
                    }
                } else {
                    match tile {
                        Tile::Wall => '#',
                        Tile::Floor => ' ',
                        Tile::Goal => '.',
                    }
                };
                line.push(ch);
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
