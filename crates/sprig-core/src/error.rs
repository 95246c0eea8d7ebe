//! Error types for sprig

use thiserror::Error;

/// The main error type for sprig operations
///
/// Steady-state frame work never produces these; they surface from startup
/// and configuration loading only.
#[derive(Debug, Error)]
pub enum SprigError {
    #[error("Host capability missing: {0}")]
    MissingCapability(String),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Unknown object: {0}")]
    UnknownObject(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for sprig operations
pub type Result<T> = std::result::Result<T, SprigError>;

impl From<toml::de::Error> for SprigError {
    fn from(err: toml::de::Error) -> Self {
        SprigError::TomlParseError(err.to_string())
    }
}
