/// Logger setup.
///
/// The terminal belongs to the renderer, so records go to a file.
/// `RUST_LOG` wins over the configured level.

use std::fs::OpenOptions;

use env_logger::{Builder, Env, Target};

use crate::config::LogConfig;
use crate::error::LogError;

pub fn init(cfg: &LogConfig) -> Result<(), LogError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.file)
        .map_err(|source| LogError::Open { path: cfg.file.clone(), source })?;

    Builder::from_env(Env::default().default_filter_or(cfg.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(())
}
