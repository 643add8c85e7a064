/// Pure game data: the board, the coins on it and the player.
/// Nothing in here touches the terminal or owns randomness.

pub mod coin;
pub mod grid;
pub mod player;
