//! Error types for the hotword engine

use thiserror::Error;

/// Errors surfaced by the hotword engine crates
#[derive(Error, Debug)]
pub enum HotwordError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result alias used across the hotword crates
pub type Result<T> = std::result::Result<T, HotwordError>;
