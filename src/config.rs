/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the current
/// directory or `~/.local/share/coingrid`. A missing file or missing keys
/// fall back to defaults; a broken file is reported and defaults are used.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::sim::world::{DEFAULT_GRID_SIZE, DEFAULT_PLAYER_NAME};

pub const CONFIG_FILE: &str = "config.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub game: GameSection,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    /// File the settings came from, if any.
    pub source: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSection {
    /// Requested size; validated later by `GameSettings::from_request`.
    pub grid_size: Option<i64>,
    pub prompt_for_size: bool,
    pub player_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub rename: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default)]
    grid_size: Option<i64>,
    #[serde(default = "default_prompt")]
    prompt_for_size: bool,
    #[serde(default = "default_player_name")]
    player_name: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_rename")]
    rename: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_prompt() -> bool { true }
fn default_player_name() -> String { DEFAULT_PLAYER_NAME.into() }
fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_rename() -> Vec<String> { vec!["Y".into()] }
fn default_log_file() -> String { "coingrid.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            grid_size: None,
            prompt_for_size: default_prompt(),
            player_name: default_player_name(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            rename: default_rename(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_schema(TomlConfig::default(), None)
    }
}

// ── Loading ──

impl GameConfig {
    /// Load `config.toml` from the first candidate directory that has one.
    /// No file at all is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match candidate_dirs().iter().map(|d| d.join(CONFIG_FILE)).find(|p| p.is_file()) {
            Some(path) => Self::load_from(&path),
            None => Ok(GameConfig::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = toml::from_str::<TomlConfig>(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(GameConfig::from_schema(schema, Some(path)))
    }

    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(|schema| GameConfig::from_schema(schema, None))
    }

    fn from_schema(cfg: TomlConfig, source: Option<&Path>) -> Self {
        // A relative log path sits next to the config file that named it.
        let log_file = PathBuf::from(&cfg.log.file);
        let log_file = match source.and_then(Path::parent) {
            Some(dir) if log_file.is_relative() => dir.join(log_file),
            _ => log_file,
        };

        GameConfig {
            game: GameSection {
                grid_size: cfg.game.grid_size,
                prompt_for_size: cfg.game.prompt_for_size,
                player_name: cfg.game.player_name,
            },
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                cancel: cfg.gamepad.cancel,
                rename: cfg.gamepad.rename,
            },
            log: LogConfig {
                file: log_file,
                level: cfg.log.level,
            },
            source: source.map(Path::to_path_buf),
        }
    }

    /// Text the size prompt starts with.
    pub fn size_prompt_default(&self) -> String {
        self.game
            .grid_size
            .map_or_else(|| DEFAULT_GRID_SIZE.to_string(), |n| n.to_string())
    }
}

/// Candidate directories: exe dir, CWD, XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![];
    let mut push = |d: PathBuf| {
        if !dirs.contains(&d) {
            dirs.push(d);
        }
    };

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            push(parent.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        push(cwd);
    }
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(home).join(".local/share/coingrid");
        if xdg.is_dir() {
            push(xdg);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.game.grid_size, None);
        assert!(cfg.game.prompt_for_size);
        assert_eq!(cfg.game.player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(cfg.gamepad.rename, vec!["Y".to_string()]);
        assert_eq!(cfg.log.level, "info");
        assert_eq!(cfg.size_prompt_default(), "3");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            r#"
            [game]
            grid_size = 6
            prompt_for_size = false

            [gamepad]
            cancel = ["B"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.game.grid_size, Some(6));
        assert!(!cfg.game.prompt_for_size);
        assert_eq!(cfg.game.player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(cfg.gamepad.cancel, vec!["B".to_string()]);
        assert_eq!(cfg.gamepad.confirm, vec!["A".to_string(), "Start".to_string()]);
        assert_eq!(cfg.size_prompt_default(), "6");
    }

    #[test]
    fn bad_types_are_errors() {
        assert!(GameConfig::from_toml_str("[game]\ngrid_size = \"big\"").is_err());
        assert!(GameConfig::from_toml_str("[speed]\ntick = 1").is_err());
    }

    #[test]
    fn load_from_file_resolves_log_path() {
        let dir = std::env::temp_dir().join(format!("coingrid-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, "[log]\nfile = \"game.log\"\nlevel = \"debug\"\n").unwrap();

        let cfg = GameConfig::load_from(&path).unwrap();
        assert_eq!(cfg.log.file, dir.join("game.log"));
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.source.as_deref(), Some(path.as_path()));

        std::fs::write(&path, "[game\n").unwrap();
        assert!(matches!(GameConfig::load_from(&path), Err(ConfigError::Parse { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(GameConfig::load_from(&path), Err(ConfigError::Read { .. })));
    }
}
