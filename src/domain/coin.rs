/// Coins and the registry that tracks which cells hold one.
///
/// A coin has no identity of its own: the registry key (its cell) is the
/// identity. Keys are unique, so two coins can never share a cell.

use std::collections::BTreeMap;

use rand::seq::IteratorRandom;
use rand::Rng;

use super::grid::{Coord, Grid};

/// Coin value tier. The value only picks the sprite and the score bump.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Denomination {
    Copper,
    Silver,
    Gold,
}

impl Denomination {
    pub const ALL: [Denomination; 3] = [Denomination::Copper, Denomination::Silver, Denomination::Gold];

    pub fn points(self) -> u32 {
        match self {
            Denomination::Copper => 100,
            Denomination::Silver => 500,
            Denomination::Gold => 1000,
        }
    }

    /// Value policy for a uniform roll in `[0, 1)`:
    ///   `< 0.1` → 1000, `< 0.4` → 500, else 100.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.1 {
            Denomination::Gold
        } else if roll < 0.4 {
            Denomination::Silver
        } else {
            Denomination::Copper
        }
    }

    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_roll(rng.random::<f64>())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Coin {
    pub value: Denomination,
    pub position: Coord,
}

impl Coin {
    pub fn new(value: Denomination, position: Coord) -> Self {
        Coin { value, position }
    }
}

/// Coordinate → coin map.
///
/// Ordered so that a seeded RNG replays the same game.
#[derive(Clone, Debug, Default)]
pub struct CoinRegistry {
    coins: BTreeMap<Coord, Coin>,
}

impl CoinRegistry {
    pub fn new() -> Self {
        CoinRegistry { coins: BTreeMap::new() }
    }

    pub fn has(&self, at: Coord) -> bool {
        self.coins.contains_key(&at)
    }

    pub fn get(&self, at: Coord) -> Option<&Coin> {
        self.coins.get(&at)
    }

    /// Insert a coin at `at`. The cell must be free; callers obtain it from
    /// `random_unoccupied`. The coin's own position is rewritten to `at`.
    pub fn place(&mut self, at: Coord, mut coin: Coin) {
        debug_assert!(!self.has(at), "coin placed on occupied cell {at}");
        coin.position = at;
        self.coins.insert(at, coin);
    }

    /// Remove and return the coin at `at`, if any.
    pub fn remove(&mut self, at: Coord) -> Option<Coin> {
        self.coins.remove(&at)
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.coins.values()
    }

    /// Number of cells that are neither a coin nor the player.
    pub fn free_cells(&self, grid: &Grid, player: Coord) -> usize {
        let blocked = self.len() + usize::from(grid.in_bounds(player) && !self.has(player));
        grid.cell_count().saturating_sub(blocked)
    }

    /// Rejection-sample a uniform in-bounds cell that holds no coin and is
    /// not `player`. Returns `None` when no such cell exists instead of
    /// sampling forever.
    pub fn random_unoccupied<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        player: Coord,
        rng: &mut R,
    ) -> Option<Coord> {
        if self.free_cells(grid, player) == 0 {
            return None;
        }
        let n = grid.size() as i32;
        loop {
            let c = Coord::new(rng.random_range(0..n), rng.random_range(0..n));
            if c != player && !self.has(c) {
                return Some(c);
            }
        }
    }

    /// Uniform pick among occupied cells; `None` on an empty registry.
    pub fn random_occupied<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        self.coins.keys().copied().choose(rng)
    }
}
