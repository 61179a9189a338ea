//! Crate-wide error type.
//!
//! Only startup and persistence paths return these; everything the user
//! interacts with degrades silently instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("could not serialize settings: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;
