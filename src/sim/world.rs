/// GameState: everything a running game owns.
///
/// Settings are derived once from the requested grid size and never change.
/// The registry, the player and the relocation countdown are mutated only by
/// `sim::step`.

use crate::domain::coin::CoinRegistry;
use crate::domain::grid::Grid;
use crate::domain::player::Player;

pub const MIN_GRID_SIZE: usize = 2;
pub const MAX_GRID_SIZE: usize = 10;
pub const DEFAULT_GRID_SIZE: usize = 3;

/// Countdown value after a relocation fires. Independent of the grid size.
pub const RELOCATION_RESET: u32 = 5;

pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Where the final grid size came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SizeSource {
    Requested,
    /// Missing, unparsable or outside [2, 10].
    Fallback,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameSettings {
    pub grid_size: usize,
    /// `floor(grid_size / 2)`
    pub coin_count: usize,
    /// `floor(30 / grid_size)`
    pub relocation_interval: u32,
    pub source: SizeSource,
}

impl GameSettings {
    /// Resolve a requested size. Out-of-range values fall back to the
    /// default rather than being clamped.
    pub fn from_request(requested: Option<i64>) -> Self {
        let accepted = requested
            .filter(|n| (MIN_GRID_SIZE as i64..=MAX_GRID_SIZE as i64).contains(n))
            .map(|n| n as usize);
        let (grid_size, source) = match accepted {
            Some(n) => (n, SizeSource::Requested),
            None => (DEFAULT_GRID_SIZE, SizeSource::Fallback),
        };
        GameSettings {
            grid_size,
            coin_count: grid_size / 2,
            relocation_interval: (30 / grid_size) as u32,
            source,
        }
    }

    /// Parse free-form prompt text. Surrounding whitespace is ignored.
    pub fn from_answer(answer: &str) -> Self {
        Self::from_request(answer.trim().parse::<i64>().ok())
    }

    /// Coins inserted per replenishment: `coin_count + 1`, kept below the
    /// number of cells so the player always has somewhere to stand.
    pub fn wave_size(&self) -> usize {
        (self.coin_count + 1).min(self.grid_size * self.grid_size - 1)
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub settings: GameSettings,
    pub grid: Grid,
    pub coins: CoinRegistry,
    pub player: Player,
    /// Valid moves left before the next coin relocation.
    pub relocation_countdown: u32,
    /// Display name. Cosmetic passthrough, except for the skin unlock.
    pub name: String,
}

impl GameState {
    /// Empty board with the player on the center cell. Coins are added by
    /// `sim::step::new_game`.
    pub fn new(settings: GameSettings, name: &str) -> Self {
        let grid = Grid::new(settings.grid_size);
        GameState {
            settings,
            grid,
            coins: CoinRegistry::new(),
            player: Player::new(grid.center()),
            relocation_countdown: settings.relocation_interval,
            name: name.to_string(),
        }
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Coord;

    #[test]
    fn derived_settings_for_every_size() {
        for n in MIN_GRID_SIZE..=MAX_GRID_SIZE {
            let s = GameSettings::from_request(Some(n as i64));
            assert_eq!(s.grid_size, n);
            assert_eq!(s.coin_count, n / 2);
            assert_eq!(s.relocation_interval, (30 / n) as u32);
            assert_eq!(s.source, SizeSource::Requested);
            assert!(s.wave_size() < n * n);
        }
    }

    #[test]
    fn three_by_three() {
        let s = GameSettings::from_request(Some(3));
        assert_eq!(s.coin_count, 1);
        assert_eq!(s.relocation_interval, 10);
        assert_eq!(s.wave_size(), 2);
    }

    #[test]
    fn invalid_sizes_fall_back() {
        for req in [None, Some(1), Some(0), Some(-4), Some(11), Some(i64::MAX)] {
            let s = GameSettings::from_request(req);
            assert_eq!(s.grid_size, DEFAULT_GRID_SIZE, "request {req:?}");
            assert_eq!(s.source, SizeSource::Fallback);
        }
    }

    #[test]
    fn prompt_answers() {
        assert_eq!(GameSettings::from_answer(" 7 ").grid_size, 7);
        assert_eq!(GameSettings::from_answer("10").grid_size, 10);
        assert_eq!(GameSettings::from_answer("").source, SizeSource::Fallback);
        assert_eq!(GameSettings::from_answer("abc").grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(GameSettings::from_answer("3.5").source, SizeSource::Fallback);
    }

    #[test]
    fn new_state_starts_centered() {
        let s = GameState::new(GameSettings::from_request(Some(5)), "Ann");
        assert_eq!(s.player.position, Coord::new(2, 2));
        assert_eq!(s.player.previous, Coord::new(2, 2));
        assert_eq!(s.relocation_countdown, 6);
        assert!(s.coins.is_empty());
        assert_eq!(s.score(), 0);
        assert_eq!(s.name, "Ann");
    }
}
