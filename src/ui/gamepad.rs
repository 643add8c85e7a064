/// Gamepad input via gilrs.
///
/// Moves are edge-triggered, one request per D-pad press or per stick push
/// past the dead zone. Action buttons come from `[gamepad]` in config.toml.
/// Default mapping:
///   D-pad / Left Stick    →  Move
///   A / Start             →  Confirm
///   Select                →  Cancel / Quit
///   Y                     →  Rename
///
/// Without the `gamepad` feature every query reports nothing pressed.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::grid::Direction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical face / shoulder buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Dominant stick direction past the dead zone. Stick Y grows upward.
pub fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    Some(if x.abs() > y.abs() {
        if x > 0.0 { Direction::Right } else { Direction::Left }
    } else if y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    })
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug)]
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    rename: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            cancel: vec![Btn::Select],
            rename: vec![Btn::Y],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last `update`.
    pressed: Vec<Btn>,
    /// Move requests since the last `update`, in order.
    moves: Vec<Direction>,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: (f32, f32),
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: Option<Direction>,

    action_map: ActionMap,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg_attr(not(feature = "gamepad"), allow(unused_mut))]
        let mut gp = GamepadState::detached();
        #[cfg(feature = "gamepad")]
        match Gilrs::new() {
            Ok(g) => {
                gp.connected = g.gamepads().next().is_some();
                gp.gilrs = Some(g);
            }
            Err(e) => log::warn!("gamepad support unavailable: {e}"),
        }
        gp
    }

    /// State with no backend attached; every query reports nothing.
    fn detached() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            pressed: Vec::new(),
            moves: Vec::new(),
            stick: (0.0, 0.0),
            stick_dir: None,
            action_map: ActionMap::default(),
            connected: false,
        }
    }

    /// Load button mapping from config. Lists with no known button names
    /// keep the defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        for (target, names) in [
            (&mut map.confirm, &cfg.confirm),
            (&mut map.cancel, &cfg.cancel),
            (&mut map.rename, &cfg.rename),
        ] {
            let parsed = parse_list(names);
            if parsed.is_empty() {
                log::warn!("no known gamepad buttons in {names:?}; keeping defaults");
            } else {
                *target = parsed;
            }
        }
    }

    pub fn update(&mut self) {
        self.pressed.clear();
        self.moves.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else { return };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    match btn {
                        Button::DPadUp => self.moves.push(Direction::Up),
                        Button::DPadRight => self.moves.push(Direction::Right),
                        Button::DPadDown => self.moves.push(Direction::Down),
                        Button::DPadLeft => self.moves.push(Direction::Left),
                        other => self.pressed.extend(Btn::from_gilrs(other)),
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick.0 = value,
                        Axis::LeftStickY => self.stick.1 = value,
                        _ => continue,
                    }
                    let dir = stick_direction(self.stick.0, self.stick.1);
                    if dir.is_some() && dir != self.stick_dir {
                        self.moves.extend(dir);
                    }
                    self.stick_dir = dir;
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick = (0.0, 0.0);
                    self.stick_dir = None;
                }
                _ => {}
            }
        }
    }

    // ── Action queries (config-driven) ──

    fn any_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|b| self.pressed.contains(b))
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.cancel)
    }

    pub fn rename_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.rename)
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.moves.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names() {
        assert_eq!(Btn::from_name("a"), Some(Btn::A));
        assert_eq!(Btn::from_name("North"), Some(Btn::Y));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("L2"), None);
    }

    #[test]
    fn stick_dead_zone_and_dominant_axis() {
        assert_eq!(stick_direction(0.1, -0.2), None);
        assert_eq!(stick_direction(0.9, 0.3), Some(Direction::Right));
        assert_eq!(stick_direction(-0.8, 0.1), Some(Direction::Left));
        assert_eq!(stick_direction(0.2, 0.7), Some(Direction::Up));
        assert_eq!(stick_direction(0.0, -1.0), Some(Direction::Down));
    }

    #[test]
    fn config_mapping_and_fallback() {
        let mut gp = GamepadState::detached();
        gp.load_button_config(&GamepadConfig {
            confirm: vec!["B".into()],
            cancel: vec!["nonsense".into()],
            rename: vec!["X".into(), "RB".into()],
        });
        assert_eq!(gp.action_map.confirm, vec![Btn::B]);
        assert_eq!(gp.action_map.cancel, vec![Btn::Select]);
        assert_eq!(gp.action_map.rename, vec![Btn::X, Btn::R1]);

        gp.pressed.push(Btn::R1);
        assert!(gp.rename_pressed());
        assert!(!gp.confirm_pressed());
        assert!(!gp.cancel_pressed());
    }
}
