/// Errors from the I/O edges of the game. Game logic itself never fails.

use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} parse error: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("could not open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("logger already initialised")]
    AlreadySet(#[from] log::SetLoggerError),
}
