/// Events emitted by a controller transition.
/// The front end consumes these for sound and logging.

use crate::domain::coin::Denomination;
use crate::domain::grid::{Coord, Direction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Moved { from: Coord, to: Coord },
    MoveBlocked { toward: Direction },
    CoinRelocated { from: Coord, to: Coord, value: Denomination },
    CoinPicked { at: Coord, value: Denomination, score: u32 },
    CoinsReplenished { count: usize },
}
