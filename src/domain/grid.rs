/// Board geometry: coordinates, directions and bounds.
///
/// Axis convention (kept for compatibility with existing boards):
///   - `x` is the ROW, `y` is the COLUMN.
///   - Up / Down change `x`, Left / Right change `y`.
///
/// ```text
///            y →
///        ┌───┬───┬───┐
///   x    │0,0│0,1│0,2│      Up    = (x-1, y)
///   ↓    ├───┼───┼───┤      Down  = (x+1, y)
///        │1,0│1,1│1,2│      Left  = (x, y-1)
///        ├───┼───┼───┤      Right = (x, y+1)
///        │2,0│2,1│2,2│
///        └───┴───┴───┘
/// ```

use std::fmt;

/// A cell position. Signed so that a step off the edge is representable
/// and can be rejected by `Grid::in_bounds`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Neighbouring cell in `dir`, without any bounds check.
    pub fn shifted(self, dir: Direction) -> Coord {
        let (dx, dy) = dir.offset();
        Coord { x: self.x + dx, y: self.y + dy }
    }
}

/// Canonical map key form: `"x,y"`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// `(dx, dy)` for one step. Vertical moves change `x`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

/// Fixed NxN coordinate space.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Grid { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn in_bounds(&self, c: Coord) -> bool {
        let n = self.size as i64;
        (0..n).contains(&(c.x as i64)) && (0..n).contains(&(c.y as i64))
    }

    /// One step from `from` toward `dir`, or `None` if it leaves the board.
    pub fn step(&self, from: Coord, dir: Direction) -> Option<Coord> {
        let to = from.shifted(dir);
        self.in_bounds(to).then_some(to)
    }

    /// Starting cell: `(floor(n/2), floor(n/2))`.
    pub fn center(&self) -> Coord {
        let mid = (self.size / 2) as i32;
        Coord::new(mid, mid)
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let n = self.size as i32;
        (0..n).flat_map(move |x| (0..n).map(move |y| Coord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open() {
        let g = Grid::new(3);
        assert!(g.in_bounds(Coord::new(0, 0)));
        assert!(g.in_bounds(Coord::new(2, 2)));
        assert!(!g.in_bounds(Coord::new(3, 0)));
        assert!(!g.in_bounds(Coord::new(0, 3)));
        assert!(!g.in_bounds(Coord::new(-1, 1)));
        assert!(!g.in_bounds(Coord::new(1, -1)));
    }

    #[test]
    fn vertical_moves_change_x() {
        let c = Coord::new(1, 1);
        assert_eq!(c.shifted(Direction::Up), Coord::new(0, 1));
        assert_eq!(c.shifted(Direction::Down), Coord::new(2, 1));
        assert_eq!(c.shifted(Direction::Left), Coord::new(1, 0));
        assert_eq!(c.shifted(Direction::Right), Coord::new(1, 2));
    }

    #[test]
    fn step_rejects_edge() {
        let g = Grid::new(3);
        assert_eq!(g.step(Coord::new(1, 1), Direction::Up), Some(Coord::new(0, 1)));
        assert_eq!(g.step(Coord::new(0, 1), Direction::Up), None);
        assert_eq!(g.step(Coord::new(1, 2), Direction::Right), None);
    }

    #[test]
    fn center_and_cells() {
        assert_eq!(Grid::new(3).center(), Coord::new(1, 1));
        assert_eq!(Grid::new(4).center(), Coord::new(2, 2));
        assert_eq!(Grid::new(2).center(), Coord::new(1, 1));

        let g = Grid::new(4);
        let cells: Vec<Coord> = g.cells().collect();
        assert_eq!(cells.len(), g.cell_count());
        assert!(cells.iter().all(|c| g.in_bounds(*c)));
    }

    #[test]
    fn display_is_map_key() {
        assert_eq!(Coord::new(2, 7).to_string(), "2,7");
    }
}
