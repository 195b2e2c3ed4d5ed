use crate::board::{ALL_DIRECTIONS, Board, Direction, Position};

/// Full deadlock oracle: true if the box at `box_pos` can provably never
/// reach a goal within the configuration `boxes`.
///
/// Combines four detectors: a wall corner, a frozen 2x2 block of boxes, a
/// doorless wall segment with no goal between two corners, and the
/// precomputed dead-end aisle cells. A box already on a goal is never a
/// deadlock.
pub fn is_deadlock(box_pos: Position, boxes: &[Position], board: &Board) -> bool {
    if board.is_goal(box_pos) {
        return false;
    }
    is_corner_deadlock(box_pos, board)
        || is_frozen_square(box_pos, boxes, board)
        || is_closed_wall_segment(box_pos, board)
        || board.is_aisle_cell(box_pos)
}

/// Static-geometry subset of the oracle (corner and frozen-square only),
/// used by the deadlock-amplified heuristic.
pub fn is_static_deadlock(box_pos: Position, boxes: &[Position], board: &Board) -> bool {
    if board.is_goal(box_pos) {
        return false;
    }
    is_corner_deadlock(box_pos, board) || is_frozen_square(box_pos, boxes, board)
}

/// Two orthogonally adjacent walls form an L around the box.
fn is_corner_deadlock(pos: Position, board: &Board) -> bool {
    let up = board.is_wall(pos.step(Direction::Up));
    let down = board.is_wall(pos.step(Direction::Down));
    let left = board.is_wall(pos.step(Direction::Left));
    let right = board.is_wall(pos.step(Direction::Right));
    (up || down) && (left || right)
}

/// A 2x2 square fully occupied by boxes, none of its cells a goal. No box
/// in such a square can ever be pushed again.
fn is_frozen_square(pos: Position, boxes: &[Position], board: &Board) -> bool {
    let has_box = |p: Position| boxes.binary_search(&p).is_ok();

    // The four 2x2 squares that contain `pos`, by top-left corner
    let anchors = [
        Position(pos.0, pos.1),
        Position(pos.0 - 1, pos.1 - 1),
        Position(pos.0 - 1, pos.1),
        Position(pos.0, pos.1 - 1),
    ];

    anchors.iter().any(|&a| {
        let cells = [
            a,
            Position(a.0, a.1 + 1),
            Position(a.0 + 1, a.1),
            Position(a.0 + 1, a.1 + 1),
        ];
        cells.iter().all(|&p| has_box(p)) && !cells.iter().any(|&p| board.is_goal(p))
    })
}

/// The box is flush against a wall, and the wall segment it sits on is
/// closed by corners on both ends, has no door (gap in the flanking wall),
/// and contains no goal. The box can only slide along the segment, so it is
/// lost.
fn is_closed_wall_segment(pos: Position, board: &Board) -> bool {
    ALL_DIRECTIONS
        .iter()
        .any(|&side| board.is_wall(pos.step(side)) && segment_closed(pos, side, board))
}

fn segment_closed(pos: Position, side: Direction, board: &Board) -> bool {
    let (walk_a, walk_b) = side.perpendicular();
    scan_to_corner(pos, side, walk_a, board) && scan_to_corner(pos, side, walk_b, board)
}

/// Walk along the wall on `side` in direction `walk`. Returns true if a
/// corner closes this end before a goal cell or a door is found.
fn scan_to_corner(pos: Position, side: Direction, walk: Direction, board: &Board) -> bool {
    let mut cur = pos;
    loop {
        if board.is_goal(cur) {
            return false;
        }
        if !board.is_wall(cur.step(side)) {
            // A door: the segment is open
            return false;
        }
        let next = cur.step(walk);
        if board.is_wall(next) {
            return true;
        }
        cur = next;
    }
}
