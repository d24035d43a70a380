//! Error types for knack-speech

use std::time::Duration;
use thiserror::Error;

/// Failure reported by a [`crate::Speaker`]
#[derive(Debug, Error)]
pub enum SpeakerError {
    /// Synthesis engine exited with an error
    #[error("engine error: {0}")]
    Engine(String),

    /// Spawning or talking to the engine failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Speaking took longer than allowed
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Error kind of a failed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The payload was not an encoded string
    PayloadDecodeFailed,
    /// The speaker reported a failure
    ActionFailed,
}

/// Text-to-speech runnable error
#[derive(Debug, Error)]
pub enum Error {
    /// Payload could not be decoded as text
    #[error("{runnable}: parsing say payload failed: {source}")]
    PayloadDecode {
        /// Runnable name
        runnable: String,
        /// Cause
        #[source]
        source: serde_json::Error,
    },

    /// Speaker failed
    #[error("{runnable}: say failed: {source}")]
    Action {
        /// Runnable name
        runnable: String,
        /// Cause
        #[source]
        source: SpeakerError,
    },
}

impl Error {
    /// Kind of failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PayloadDecode { .. } => ErrorKind::PayloadDecodeFailed,
            Self::Action { .. } => ErrorKind::ActionFailed,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
