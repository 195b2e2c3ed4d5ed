use crate::board::Position;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Zobrist hash tables sized to one board.
///
/// Every cell gets one random value for "a box sits here" and one for "the
/// player stands here"; a state hash is the XOR of the values for its
/// occupied cells, so moving a single box is a two-XOR update. Tables are
/// drawn from a fixed-seed PRNG, so two boards with the same dimensions
/// hash identical states identically.
pub struct Zobrist {
    width: usize,
    box_hashes: Vec<u64>,
    player_hashes: Vec<u64>,
}

impl Zobrist {
    pub fn new(width: usize, height: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0x50c0ba2d5eed);
        let cells = width * height;

        let box_hashes = (0..cells).map(|_| rng.next_u64()).collect();
        let player_hashes = (0..cells).map(|_| rng.next_u64()).collect();

        Zobrist {
            width,
            box_hashes,
            player_hashes,
        }
    }

    /// Hash value for a box at `pos`. The position must lie on the board.
    pub fn box_hash(&self, pos: Position) -> u64 {
        self.box_hashes[self.index(pos)]
    }

    /// Hash value for the player at `pos`. The position must lie on the
    /// board.
    pub fn player_hash(&self, pos: Position) -> u64 {
        self.player_hashes[self.index(pos)]
    }

    fn index(&self, pos: Position) -> usize {
        pos.0 as usize * self.width + pos.1 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_reproducible() {
        let a = Zobrist::new(5, 3);
        let b = Zobrist::new(5, 3);
        let pos = Position(2, 4);
        assert_eq!(a.box_hash(pos), b.box_hash(pos));
        assert_eq!(a.player_hash(pos), b.player_hash(pos));
    }

    #[test]
    fn test_box_and_player_tables_distinct() {
        let z = Zobrist::new(4, 4);
        let pos = Position(1, 1);
        assert_ne!(z.box_hash(pos), z.player_hash(pos));
    }

    #[test]
    fn test_cells_hash_independently() {
        // (0,1) and (1,0) land on different table slots
        let z = Zobrist::new(6, 6);
        assert_ne!(z.box_hash(Position(0, 1)), z.box_hash(Position(1, 0)));
    }
}
