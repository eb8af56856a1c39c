//! The tile wall: shuffled draw pile plus a pre-commitment digest.
//!
//! A wall is built once per match, either from the thread RNG or from a
//! fixed seed (`ChaCha8` keeps the seeded sequence identical across runs, so
//! tests and replays can reproduce a match exactly). The SHA-256 digest over
//! the ordered tiles is computed at build time and can be disclosed to seats
//! before any tile is revealed, proving the wall was not reordered later.

use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

use super::constants::{RANKS_PER_SUIT, TILE_COPIES, WALL_SIZE};
use super::entities::{Suit, Tile};

#[derive(Debug)]
pub struct TileWall {
    tiles: VecDeque<Tile>,
    hash: String,
}

impl TileWall {
    /// Build and shuffle a fresh wall. A seed makes the order deterministic.
    #[must_use]
    pub fn build(seed: Option<u64>) -> Self {
        let mut tiles = full_set();
        match seed {
            Some(seed) => tiles.shuffle(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => tiles.shuffle(&mut rand::rng()),
        }
        let hash = digest(&tiles);
        Self {
            tiles: VecDeque::from(tiles),
            hash,
        }
    }

    /// Digest over the shuffled order, usable as a pre-commitment proof.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Draw from the front of the wall (the normal turn draw).
    pub fn draw_front(&mut self) -> Option<Tile> {
        self.tiles.pop_front()
    }

    /// Draw from the back of the wall (kan replacement draws).
    pub fn draw_back(&mut self) -> Option<Tile> {
        self.tiles.pop_back()
    }
}

fn full_set() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(WALL_SIZE);
    for _ in 0..TILE_COPIES {
        for suit in Suit::ALL {
            for rank in 1..=RANKS_PER_SUIT {
                tiles.push(Tile(rank, suit));
            }
        }
    }
    tiles
}

fn digest(tiles: &[Tile]) -> String {
    let mut hasher = Sha256::new();
    for tile in tiles {
        hasher.update(tile.to_string().as_bytes());
    }
    hex::encode(hasher.finalize())
}
