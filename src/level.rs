use crate::board::{Board, MAX_BOXES, MAX_SIZE, Position, Tile};
use crate::error::SolverError;
use crate::state::State;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Load and validate a map file, producing the initial search state.
pub fn load_file(path: &Path) -> Result<State, SolverError> {
    let contents = fs::read_to_string(path)?;
    parse(&contents)
}

/// What a single map character contributes to the board: its tile, plus
/// optionally a box and/or the player standing on it.
fn classify(ch: char) -> Option<(Tile, bool, bool)> {
    match ch {
        '#' => Some((Tile::Wall, false, false)),
        ' ' => Some((Tile::Floor, false, false)),
        '.' => Some((Tile::Goal, false, false)),
        '$' => Some((Tile::Floor, true, false)),
        '*' => Some((Tile::Goal, true, false)),
        '@' => Some((Tile::Floor, false, true)),
        '+' => Some((Tile::Goal, false, true)),
        _ => None,
    }
}

/// Everything collected in one pass over the map text. Validation happens
/// afterwards, over the collected sets.
struct Scan {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    players: Vec<Position>,
    boxes: Vec<Position>,
    goals: Vec<Position>,
}

/// Parse a Sokoban map from text.
///
/// Characters: `#` wall, space floor, `.` goal, `$` box, `@` player, `*`
/// box on goal, `+` player on goal. Trailing whitespace on each line is
/// ignored; short lines are padded with floor. The map must contain
/// exactly one player and equally many boxes and goals, at least one each.
pub fn parse(text: &str) -> Result<State, SolverError> {
    let scan = scan_text(text)?;

    let player = match scan.players.as_slice() {
        [] => return Err(SolverError::InvalidMap("map has no player".to_string())),
        [one] => *one,
        _ => {
            return Err(SolverError::InvalidMap(
                "map has more than one player".to_string(),
            ));
        }
    };

    if scan.boxes.is_empty() {
        return Err(SolverError::InvalidMap("map has no boxes".to_string()));
    }
    if scan.boxes.len() > MAX_BOXES {
        return Err(SolverError::InvalidMap(format!(
            "map has {} boxes but at most {} are supported",
            scan.boxes.len(),
            MAX_BOXES
        )));
    }
    if scan.boxes.len() != scan.goals.len() {
        return Err(SolverError::InvalidMap(format!(
            "map has {} boxes but {} goals",
            scan.boxes.len(),
            scan.goals.len()
        )));
    }

    let board = Arc::new(Board::new(scan.width, scan.height, scan.tiles, scan.goals));
    Ok(State::new(board, player, scan.boxes))
}

fn scan_text(text: &str) -> Result<Scan, SolverError> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let height = lines.len();
    let width = lines.iter().map(|line| line.len()).max().unwrap_or(0);

    if width == 0 {
        return Err(SolverError::InvalidMap("map is empty".to_string()));
    }
    if width > MAX_SIZE || height > MAX_SIZE {
        return Err(SolverError::InvalidMap(format!(
            "map is {}x{} but the largest supported board is {}x{}",
            height, width, MAX_SIZE, MAX_SIZE
        )));
    }

    let mut scan = Scan {
        width,
        height,
        tiles: vec![Tile::Floor; width * height],
        players: Vec::new(),
        boxes: Vec::new(),
        goals: Vec::new(),
    };

    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let Some((tile, has_box, has_player)) = classify(ch) else {
                return Err(SolverError::InvalidMap(format!(
                    "unrecognized character '{}' in row {}",
                    ch, row
                )));
            };

            let pos = Position(row as i16, col as i16);
            scan.tiles[row * width + col] = tile;
            if tile == Tile::Goal {
                scan.goals.push(pos);
            }
            if has_box {
                scan.boxes.push(pos);
            }
            if has_player {
                scan.players.push(pos);
            }
        }
    }

    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let state = parse(
            "#####\n\
             #@$.#\n\
             #####",
        )
        .unwrap();
        assert_eq!(state.player(), Position(1, 1));
        assert_eq!(state.boxes(), &[Position(1, 2)]);
        assert_eq!(state.board().goals(), &[Position(1, 3)]);
    }

    #[test]
    fn test_parse_box_and_player_on_goals() {
        let state = parse(
            "#####\n\
             #+$*#\n\
             #  .#\n\
             #####",
        )
        .unwrap();
        assert_eq!(state.player(), Position(1, 1));
        assert_eq!(state.boxes(), &[Position(1, 2), Position(1, 3)]);
        // Goals at the player, under the second box, and the free cell
        assert_eq!(state.board().goals().len(), 3);
        assert!(state.board().is_goal(Position(1, 1)));
        assert!(state.board().is_goal(Position(1, 3)));
    }

    #[test]
    fn test_trailing_whitespace_stripped() {
        let state = parse("#####   \n#@$.#\t\n#####  ").unwrap();
        assert_eq!(state.player(), Position(1, 1));
    }

    #[test]
    fn test_ragged_lines_padded_with_floor() {
        let state = parse(
            "######\n\
             #@$.#\n\
             ######",
        )
        .unwrap();
        assert!(!state.board().is_wall(Position(1, 5)));
    }

    #[test]
    fn test_unknown_character_rejected() {
        let result = parse("#####\n#@$x#\n#####");
        assert!(matches!(result, Err(SolverError::InvalidMap(msg)) if msg.contains('x')));
    }

    #[test]
    fn test_missing_player_rejected() {
        let result = parse("####\n#$.#\n####");
        assert!(matches!(result, Err(SolverError::InvalidMap(_))));
    }

    #[test]
    fn test_multiple_players_rejected() {
        let result = parse("#####\n#@@$#\n#  .#\n#####");
        assert!(matches!(result, Err(SolverError::InvalidMap(_))));
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let result = parse("#####\n#@$ #\n#. .#\n#####");
        assert!(matches!(result, Err(SolverError::InvalidMap(_))));
    }

    #[test]
    fn test_no_boxes_rejected() {
        let result = parse("####\n#@ #\n####");
        assert!(matches!(result, Err(SolverError::InvalidMap(_))));
    }

    #[test]
    fn test_empty_map_rejected() {
        assert!(matches!(parse(""), Err(SolverError::InvalidMap(_))));
    }

    #[test]
    fn test_oversized_map_rejected() {
        let row = "#".repeat(MAX_SIZE + 1);
        let result = parse(&row);
        assert!(matches!(result, Err(SolverError::InvalidMap(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_file(Path::new("no_such_level.txt"));
        assert!(matches!(result, Err(SolverError::Io(_))));
    }
}
