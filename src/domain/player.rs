/// Player token. Plain data; only the game controller mutates it.

use super::grid::Coord;

/// Purely visual skin. No gameplay effect.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cosmetic {
    #[default]
    Default,
    Alternate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub position: Coord,
    pub previous: Coord,
    pub score: u32,
    pub cosmetic: Cosmetic,
}

impl Player {
    /// A fresh player whose previous position equals its start cell.
    pub fn new(at: Coord) -> Self {
        Player {
            position: at,
            previous: at,
            score: 0,
            cosmetic: Cosmetic::Default,
        }
    }

    /// Record the current cell as previous and move to `to`.
    pub fn advance_to(&mut self, to: Coord) {
        self.previous = self.position;
        self.position = to;
    }

    /// Add picked-up points. Saturates rather than wrapping.
    pub fn credit(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_previous() {
        let mut p = Player::new(Coord::new(1, 1));
        assert_eq!(p.previous, p.position);
        p.advance_to(Coord::new(0, 1));
        assert_eq!(p.position, Coord::new(0, 1));
        assert_eq!(p.previous, Coord::new(1, 1));
    }

    #[test]
    fn credit_accumulates() {
        let mut p = Player::new(Coord::default());
        p.credit(500);
        p.credit(100);
        assert_eq!(p.score, 600);
        p.score = u32::MAX - 1;
        p.credit(1000);
        assert_eq!(p.score, u32::MAX);
    }
}
