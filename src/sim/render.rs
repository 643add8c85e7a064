/// Render instructions and the drawing surface they target.
///
/// The controller never draws. It returns a list of `RenderOp`s and the
/// front end replays them onto any `Canvas`. `BoardMirror` is the in-memory
/// canvas: the terminal renderer keeps one, and tests use one to check that
/// the ops alone reproduce the game state.

use crate::domain::coin::Denomination;
use crate::domain::grid::{Coord, Grid};
use crate::domain::player::Cosmetic;

/// Opaque sprite selector: three coin tiers, two player skins.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VisualKey {
    Coin(Denomination),
    Player(Cosmetic),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RenderOp {
    Draw { key: VisualKey, at: Coord },
    Erase { at: Coord },
}

/// A surface that can show one sprite per cell.
pub trait Canvas {
    fn draw(&mut self, key: VisualKey, at: Coord);
    fn erase(&mut self, at: Coord);
}

/// Replay `ops` in order.
pub fn apply<C: Canvas + ?Sized>(canvas: &mut C, ops: &[RenderOp]) {
    for op in ops {
        match *op {
            RenderOp::Draw { key, at } => canvas.draw(key, at),
            RenderOp::Erase { at } => canvas.erase(at),
        }
    }
}

/// One optional sprite per cell, row-major.
#[derive(Clone, Debug)]
pub struct BoardMirror {
    grid: Grid,
    cells: Vec<Option<VisualKey>>,
}

impl BoardMirror {
    pub fn new(grid: Grid) -> Self {
        BoardMirror {
            grid,
            cells: vec![None; grid.cell_count()],
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    fn index(&self, at: Coord) -> Option<usize> {
        self.grid
            .in_bounds(at)
            .then(|| at.x as usize * self.grid.size() + at.y as usize)
    }

    pub fn at(&self, at: Coord) -> Option<VisualKey> {
        self.index(at).and_then(|i| self.cells[i])
    }

    /// All drawn cells with their sprite, row by row.
    #[cfg(test)]
    pub fn drawn(&self) -> impl Iterator<Item = (Coord, VisualKey)> + '_ {
        self.grid.cells().filter_map(move |c| self.at(c).map(|k| (c, k)))
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Canvas for BoardMirror {
    fn draw(&mut self, key: VisualKey, at: Coord) {
        if let Some(i) = self.index(at) {
            self.cells[i] = Some(key);
        }
    }

    fn erase(&mut self, at: Coord) {
        if let Some(i) = self.index(at) {
            self.cells[i] = None;
        }
    }
}
