/// Keyboard input.
///
/// Moves are discrete: every Press or Repeat event is one request, so
/// holding an arrow key walks at the terminal's repeat rate. Release events
/// are ignored. Printable characters are also collected in order for the
/// text prompts.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::grid::Direction;

// ── Key Constants ──

pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RENAME: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
pub const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
pub const KEYS_CANCEL: &[KeyCode] = &[KeyCode::Esc];

/// Direction bound to `code`, if any.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    let table = [
        (KEYS_UP, Direction::Up),
        (KEYS_RIGHT, Direction::Right),
        (KEYS_DOWN, Direction::Down),
        (KEYS_LEFT, Direction::Left),
    ];
    table.iter().find(|(keys, _)| keys.contains(&code)).map(|&(_, dir)| dir)
}

pub struct InputState {
    /// Press/Repeat key codes from the most recent drain, in order.
    pressed: Vec<KeyCode>,
    /// Printable characters typed during the most recent drain.
    typed: Vec<char>,
    ctrl_c: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            pressed: Vec::with_capacity(8),
            typed: Vec::with_capacity(8),
            ctrl_c: false,
        }
    }

    /// Wait up to `timeout` for the first event, then drain everything
    /// pending. Call once per frame.
    pub fn drain_events(&mut self, timeout: Duration) {
        self.pressed.clear();
        self.typed.clear();
        self.ctrl_c = false;

        let mut wait = timeout;
        while poll(wait).unwrap_or(false) {
            wait = Duration::ZERO;
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }
    }

    fn record(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
            self.ctrl_c = true;
            return;
        }
        self.pressed.push(key.code);
        if let KeyCode::Char(c) = key.code {
            if !ctrl && !c.is_control() {
                self.typed.push(c);
            }
        }
    }

    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Move requests in arrival order.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pressed.iter().filter_map(|c| direction_for(*c))
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Char('d')), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Char('S')), Some(Direction::Down));
        assert_eq!(direction_for(KeyCode::Left), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Char('n')), None);
        assert_eq!(direction_for(KeyCode::Enter), None);
    }

    #[test]
    fn records_presses_and_typed_text() {
        let mut kb = InputState::new();
        kb.record(press(KeyCode::Up));
        kb.record(press(KeyCode::Char('a')));
        kb.record(KeyEvent::new_with_kind(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Release));
        kb.record(press(KeyCode::Char('7')));

        let dirs: Vec<Direction> = kb.directions().collect();
        assert_eq!(dirs, vec![Direction::Up, Direction::Left]);
        assert_eq!(kb.typed(), &['a', '7']);
        assert!(!kb.was_pressed(KeyCode::Down));
        assert!(!kb.ctrl_c_pressed());
    }

    #[test]
    fn ctrl_c_is_not_typed() {
        let mut kb = InputState::new();
        kb.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(kb.ctrl_c_pressed());
        assert!(kb.typed().is_empty());
        assert!(!kb.any_pressed(&[KeyCode::Char('c')]));
    }
}
