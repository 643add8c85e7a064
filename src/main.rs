/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::io;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::ThreadRng;

use config::GameConfig;
use sim::event::GameEvent;
use sim::render::apply;
use sim::step::{self, RenameOutcome};
use sim::world::{GameSettings, GameState, SizeSource, MAX_GRID_SIZE, MIN_GRID_SIZE};
use ui::gamepad::GamepadState;
use ui::input::{InputState, KEYS_CANCEL, KEYS_CONFIRM, KEYS_QUIT, KEYS_RENAME};
use ui::prompt::LineEditor;
use ui::renderer::{Renderer, View};
use ui::sound::SoundEngine;

/// Longest wait for input before the frame is redrawn anyway.
const FRAME_WAIT: Duration = Duration::from_millis(50);

const NAME_LABEL: &str = "Enter your name:";
const NAME_MAX_CHARS: usize = 16;
const SIZE_MAX_CHARS: usize = 4;

fn main() {
    let (config, config_err) = match GameConfig::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (GameConfig::default(), Some(e)),
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Logging disabled: {e}");
    }
    match (&config_err, &config.source) {
        (Some(e), _) => warn!("{e}; using defaults"),
        (None, Some(path)) => info!("settings loaded from {}", path.display()),
        (None, None) => info!("no config file found; using defaults"),
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let mut app = App::new(&config);

    let result = game_loop(&mut app, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    if let Some(game) = &app.game {
        info!("game over: {} scored {}", game.name, game.score());
        println!();
        println!("Thanks for playing, {}!", game.name);
        println!("Final Score: {}", game.score());
    }
}

// ══════════════════════════════════════════════════════════════
// App: screens and the running game
// ══════════════════════════════════════════════════════════════

enum Screen {
    SizePrompt(LineEditor),
    Playing,
    NamePrompt(LineEditor),
}

struct App {
    screen: Screen,
    game: Option<GameState>,
    rng: ThreadRng,
    /// Name used when the game starts.
    start_name: String,
    message: String,
}

impl App {
    fn new(config: &GameConfig) -> Self {
        let label = format!("Enter grid size ({MIN_GRID_SIZE}-{MAX_GRID_SIZE}):");
        App {
            screen: Screen::SizePrompt(LineEditor::new(
                &label,
                &config.size_prompt_default(),
                SIZE_MAX_CHARS,
            )),
            game: None,
            rng: rand::rng(),
            start_name: config.game.player_name.clone(),
            message: String::new(),
        }
    }

    fn start(&mut self, settings: GameSettings, renderer: &mut Renderer, sound: Option<&SoundEngine>) {
        if settings.source == SizeSource::Fallback {
            warn!("grid size not in {MIN_GRID_SIZE}-{MAX_GRID_SIZE}; falling back to {}", settings.grid_size);
            self.message = format!("Invalid size, playing on {0}x{0}", settings.grid_size);
        } else {
            self.message.clear();
        }

        let (game, ops) = step::new_game(settings, &self.start_name, &mut self.rng);
        renderer.reset_board(game.grid);
        apply(renderer, &ops);
        if let Some(s) = sound {
            s.play_replenish();
        }
        self.game = Some(game);
        self.screen = Screen::Playing;
    }

    fn view(&self, pad_connected: bool) -> View<'_> {
        let prompt = match &self.screen {
            Screen::SizePrompt(e) | Screen::NamePrompt(e) => Some((e.label(), e.text())),
            Screen::Playing => None,
        };
        View {
            name: self.game.as_ref().map_or(self.start_name.as_str(), |g| g.name.as_str()),
            score: self.game.as_ref().map_or(0, GameState::score),
            moves_to_shuffle: self.game.as_ref().map(|g| g.relocation_countdown + 1),
            message: &self.message,
            prompt,
            pad_connected,
        }
    }

    // ── Per-screen input handling. Each returns false to quit. ──

    fn handle_size_prompt(
        &mut self,
        kb: &InputState,
        gp: &GamepadState,
        renderer: &mut Renderer,
        sound: Option<&SoundEngine>,
    ) -> bool {
        let Screen::SizePrompt(editor) = &mut self.screen else { return true };

        if kb.any_pressed(KEYS_CANCEL) || gp.cancel_pressed() {
            return false;
        }
        edit_line(editor, kb);

        if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() {
            let settings = GameSettings::from_answer(editor.text());
            self.start(settings, renderer, sound);
        }
        true
    }

    fn handle_playing(
        &mut self,
        kb: &InputState,
        gp: &GamepadState,
        renderer: &mut Renderer,
        sound: Option<&SoundEngine>,
    ) -> bool {
        if kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
            return false;
        }
        let Some(game) = self.game.as_mut() else { return true };

        if kb.any_pressed(KEYS_RENAME) || gp.rename_pressed() {
            self.screen = Screen::NamePrompt(LineEditor::new(NAME_LABEL, &game.name, NAME_MAX_CHARS));
            self.message.clear();
            return true;
        }

        for dir in kb.directions().chain(gp.directions()) {
            let outcome = step::move_player(game, dir, &mut self.rng);
            apply(renderer, &outcome.render);
            announce(&outcome.events, &mut self.message, sound);
        }
        true
    }

    fn handle_name_prompt(
        &mut self,
        kb: &InputState,
        gp: &GamepadState,
        renderer: &mut Renderer,
        sound: Option<&SoundEngine>,
    ) -> bool {
        let Screen::NamePrompt(editor) = &mut self.screen else { return true };

        if kb.any_pressed(KEYS_CANCEL) || gp.cancel_pressed() {
            self.screen = Screen::Playing;
            return true;
        }
        edit_line(editor, kb);

        if !(kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed()) {
            return true;
        }
        let Some(game) = self.game.as_mut() else { return true };

        let (outcome, ops) = step::rename(game, editor.text());
        apply(renderer, &ops);
        self.message = match outcome {
            RenameOutcome::Rejected => "Names need at least 2 characters".to_string(),
            RenameOutcome::Renamed => format!("Hello, {}!", game.name),
            RenameOutcome::Unlocked => {
                if let Some(s) = sound {
                    s.play_unlock();
                }
                "Secret skin unlocked!".to_string()
            }
        };
        debug!("rename to {:?}: {outcome:?}", game.name);
        self.screen = Screen::Playing;
        true
    }
}

/// Apply this frame's typing to a prompt line.
fn edit_line(editor: &mut LineEditor, kb: &InputState) {
    if kb.was_pressed(crossterm::event::KeyCode::Backspace) {
        editor.backspace();
    }
    editor.extend(kb.typed());
}

/// Turn controller events into sound cues and a status line.
fn announce(events: &[GameEvent], message: &mut String, sound: Option<&SoundEngine>) {
    for event in events {
        match event {
            GameEvent::Moved { .. } => message.clear(),
            GameEvent::MoveBlocked { toward } => {
                debug!("blocked toward {toward:?}");
                if let Some(s) = sound {
                    s.play_bump();
                }
            }
            GameEvent::CoinRelocated { from, to, value } => {
                debug!("{} coin hopped {from} -> {to}", value.points());
                if let Some(s) = sound {
                    s.play_relocate();
                }
            }
            GameEvent::CoinPicked { at, value, score } => {
                debug!("picked {} at {at}, score {score}", value.points());
                *message = format!("+{}", value.points());
                if let Some(s) = sound {
                    s.play_coin(*value);
                }
            }
            GameEvent::CoinsReplenished { count } => {
                *message = format!("{count} new coins!");
                if let Some(s) = sound {
                    s.play_replenish();
                }
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Game loop
// ══════════════════════════════════════════════════════════════

fn game_loop(
    app: &mut App,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> io::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    if !config.game.prompt_for_size && config.game.grid_size.is_some() {
        app.start(GameSettings::from_request(config.game.grid_size), renderer, sound);
    }

    loop {
        renderer.render(&app.view(gp.connected))?;

        kb.drain_events(FRAME_WAIT);
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let keep_going = match app.screen {
            Screen::SizePrompt(_) => app.handle_size_prompt(&kb, &gp, renderer, sound),
            Screen::Playing => app.handle_playing(&kb, &gp, renderer, sound),
            Screen::NamePrompt(_) => app.handle_name_prompt(&kb, &gp, renderer, sound),
        };
        if !keep_going {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sim::render::{BoardMirror, RenderOp};

    #[test]
    fn announce_sets_status_line() {
        let mut msg = String::from("old");
        announce(
            &[GameEvent::Moved { from: domain::grid::Coord::new(1, 1), to: domain::grid::Coord::new(0, 1) }],
            &mut msg,
            None,
        );
        assert!(msg.is_empty());

        announce(&[GameEvent::CoinsReplenished { count: 2 }], &mut msg, None);
        assert_eq!(msg, "2 new coins!");
    }

    #[test]
    fn typed_size_replaces_default_answer() {
        let mut editor = LineEditor::new("Enter grid size (2-10):", "3", SIZE_MAX_CHARS);
        editor.extend(&['5']);
        let settings = GameSettings::from_answer(editor.text());
        assert_eq!(settings.grid_size, 5);
        assert_eq!(settings.source, SizeSource::Requested);
    }

    #[test]
    fn start_ops_paint_a_mirror() {
        let mut rng = StdRng::seed_from_u64(3);
        let (game, ops) = step::new_game(GameSettings::from_request(Some(4)), "Ann", &mut rng);
        let mut board = BoardMirror::new(game.grid);
        apply(&mut board, &ops);
        assert_eq!(board.drawn().count(), game.coins.len() + 1);
        assert!(ops.iter().all(|op| matches!(op, RenderOp::Draw { .. })));
    }
}
