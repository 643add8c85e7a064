/// The game controller: turns one external event into a state change plus
/// render instructions.
///
/// Move processing order:
///   1. Bounds check (blocked moves change nothing)
///   2. Player advance (previous ← current)
///   3. Relocation countdown (every valid move)
///   4. Player redraw / previous-cell erase
///   5. Pickup resolution, then replenishment when the registry empties
///
/// All randomness comes from the caller's RNG so a seeded generator replays
/// a game exactly.

use log::{debug, info};
use rand::Rng;

use super::event::GameEvent;
use super::render::{RenderOp, VisualKey};
use super::world::{GameSettings, GameState, RELOCATION_RESET};
use crate::domain::coin::{Coin, Denomination};
use crate::domain::grid::Direction;
use crate::domain::player::Cosmetic;

/// Name that unlocks the alternate skin, compared case-insensitively.
pub const UNLOCK_NAME: &str = "mlg";

/// Shortest accepted display name, in characters.
pub const MIN_NAME_LEN: usize = 2;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// False when the request pointed off the board.
    pub moved: bool,
    pub events: Vec<GameEvent>,
    pub render: Vec<RenderOp>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RenameOutcome {
    /// Too short; the old name stays.
    Rejected,
    Renamed,
    /// Renamed to the trigger name; the player now uses the alternate skin.
    Unlocked,
}

// ══════════════════════════════════════════════════════════════
// Entry points
// ══════════════════════════════════════════════════════════════

/// Start a game: empty registry, player on the center cell, one wave of
/// coins. Returns the state and the full-board render list.
pub fn new_game<R: Rng + ?Sized>(
    settings: GameSettings,
    name: &str,
    rng: &mut R,
) -> (GameState, Vec<RenderOp>) {
    let mut state = GameState::new(settings, name);
    let mut scratch = MoveOutcome::default();
    replenish(&mut state, rng, &mut scratch);

    info!(
        "new game: {n}x{n}, {coins} coins per wave, relocation every {every} moves, player at {at}",
        n = settings.grid_size,
        coins = settings.wave_size(),
        every = settings.relocation_interval,
        at = state.player.position,
    );

    let render = board_ops(&state);
    (state, render)
}

/// Handle one move request.
pub fn move_player<R: Rng + ?Sized>(
    state: &mut GameState,
    dir: Direction,
    rng: &mut R,
) -> MoveOutcome {
    let mut out = MoveOutcome::default();
    let from = state.player.position;

    match state.grid.step(from, dir) {
        Some(to) => {
            state.player.advance_to(to);
            out.moved = true;
            out.events.push(GameEvent::Moved { from, to });
            debug!("move {dir:?}: {from} -> {to}");

            tick_relocation(state, rng, &mut out);
            redraw_player(state, &mut out);
        }
        None => {
            out.events.push(GameEvent::MoveBlocked { toward: dir });
            debug!("move {dir:?} from {from} blocked by edge");
        }
    }

    resolve_pickup(state, rng, &mut out);
    out
}

/// Change the display name. Names shorter than two characters are ignored.
pub fn rename(state: &mut GameState, name: &str) -> (RenameOutcome, Vec<RenderOp>) {
    if name.chars().count() < MIN_NAME_LEN {
        return (RenameOutcome::Rejected, vec![]);
    }
    state.name = name.to_string();

    if name.to_lowercase() == UNLOCK_NAME {
        state.player.cosmetic = Cosmetic::Alternate;
        info!("alternate skin unlocked");
        let redraw = RenderOp::Draw { key: player_key(state), at: state.player.position };
        return (RenameOutcome::Unlocked, vec![redraw]);
    }
    (RenameOutcome::Renamed, vec![])
}

/// Draw list for the whole board: every coin, then the player.
pub fn board_ops(state: &GameState) -> Vec<RenderOp> {
    state
        .coins
        .iter()
        .map(|c| RenderOp::Draw { key: VisualKey::Coin(c.value), at: c.position })
        .chain(std::iter::once(RenderOp::Draw {
            key: player_key(state),
            at: state.player.position,
        }))
        .collect()
}

pub fn player_key(state: &GameState) -> VisualKey {
    VisualKey::Player(state.player.cosmetic)
}

// ══════════════════════════════════════════════════════════════
// Relocation
// ══════════════════════════════════════════════════════════════

fn tick_relocation<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, out: &mut MoveOutcome) {
    if state.relocation_countdown > 0 {
        state.relocation_countdown -= 1;
        return;
    }
    state.relocation_countdown = RELOCATION_RESET;
    relocate_one(state, rng, out);
}

/// Move one random coin to a random free cell. The vacated cell is itself
/// eligible, so a coin may land where it started.
fn relocate_one<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, out: &mut MoveOutcome) {
    let Some(from) = state.coins.random_occupied(rng) else { return };
    let Some(coin) = state.coins.remove(from) else { return };

    match state.coins.random_unoccupied(&state.grid, state.player.position, rng) {
        Some(to) => {
            state.coins.place(to, coin);
            out.render.push(RenderOp::Erase { at: from });
            out.render.push(RenderOp::Draw { key: VisualKey::Coin(coin.value), at: to });
            out.events.push(GameEvent::CoinRelocated { from, to, value: coin.value });
            debug!("relocated {} coin {from} -> {to}", coin.value.points());
        }
        None => state.coins.place(from, coin),
    }
}

// ══════════════════════════════════════════════════════════════
// Redraw / pickup / replenish
// ══════════════════════════════════════════════════════════════

fn redraw_player(state: &GameState, out: &mut MoveOutcome) {
    let p = &state.player;
    out.render.push(RenderOp::Draw { key: player_key(state), at: p.position });
    // Keep coins (including one just relocated onto the old cell) visible.
    if p.previous != p.position && !state.coins.has(p.previous) {
        out.render.push(RenderOp::Erase { at: p.previous });
    }
}

fn resolve_pickup<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, out: &mut MoveOutcome) {
    let at = state.player.position;
    let Some(coin) = state.coins.remove(at) else { return };

    state.player.credit(coin.value.points());
    out.events.push(GameEvent::CoinPicked { at, value: coin.value, score: state.player.score });
    debug!("picked {} at {at}, score {}", coin.value.points(), state.player.score);

    if state.coins.is_empty() {
        replenish(state, rng, out);
    }
}

/// Insert one wave (`coin_count + 1`) of coins on distinct free cells.
fn replenish<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, out: &mut MoveOutcome) {
    let mut placed = 0;
    for _ in 0..state.settings.wave_size() {
        let Some(at) = state.coins.random_unoccupied(&state.grid, state.player.position, rng) else {
            break;
        };
        let value = Denomination::draw(rng);
        state.coins.place(at, Coin::new(value, at));
        out.render.push(RenderOp::Draw { key: VisualKey::Coin(value), at });
        placed += 1;
    }
    out.events.push(GameEvent::CoinsReplenished { count: placed });
    debug!("replenished {placed} coins");
}
