use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Event decoding error: {0}")]
    EventDecode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored state contradicts an invariant of the projection.
    ///
    /// The event that detected it must be aborted; recovery is a full replay.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Serialization(err.to_string())
    }
}
