//! Error types for knack-audio

use crate::stream::StreamState;
use knack_core::InstanceId;
use thiserror::Error;

/// Failure reported by a native driver, or a state violation caught before
/// reaching it
#[derive(Debug, Error)]
pub enum DriverError {
    /// Operation not valid in the current stream state
    #[error("stream is {state}")]
    InvalidState {
        /// State the stream was in
        state: StreamState,
    },

    /// Requested configuration not supported by the driver
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Audio device error
    #[error("audio device error: {0}")]
    Device(String),

    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),

    /// The native stream went away
    #[error("stream disconnected")]
    Disconnected,
}

/// Stream error kind, one per lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Options rejected before opening
    InvalidOptions,
    /// Opening the native stream failed
    OpenFailed,
    /// Starting failed
    StartFailed,
    /// Stopping failed
    StopFailed,
    /// Closing failed
    CloseFailed,
    /// Reading a buffer failed
    ReadFailed,
}

/// Stream lifecycle error
#[derive(Debug, Error)]
pub enum Error {
    /// Stream options are invalid
    #[error("invalid stream options: {0}")]
    InvalidOptions(String),

    /// Opening failed
    #[error("opening default stream {id} failed: {source}")]
    Open {
        /// Stream identity
        id: InstanceId,
        /// Cause
        #[source]
        source: DriverError,
    },

    /// Starting failed
    #[error("starting stream {id} failed: {source}")]
    Start {
        /// Stream identity
        id: InstanceId,
        /// Cause
        #[source]
        source: DriverError,
    },

    /// Stopping failed
    #[error("stopping stream {id} failed: {source}")]
    Stop {
        /// Stream identity
        id: InstanceId,
        /// Cause
        #[source]
        source: DriverError,
    },

    /// Closing failed
    #[error("closing stream {id} failed: {source}")]
    Close {
        /// Stream identity
        id: InstanceId,
        /// Cause
        #[source]
        source: DriverError,
    },

    /// Reading failed
    #[error("reading from stream {id} failed: {source}")]
    Read {
        /// Stream identity
        id: InstanceId,
        /// Cause
        #[source]
        source: DriverError,
    },
}

impl Error {
    /// Operation that failed
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOptions(_) => ErrorKind::InvalidOptions,
            Self::Open { .. } => ErrorKind::OpenFailed,
            Self::Start { .. } => ErrorKind::StartFailed,
            Self::Stop { .. } => ErrorKind::StopFailed,
            Self::Close { .. } => ErrorKind::CloseFailed,
            Self::Read { .. } => ErrorKind::ReadFailed,
        }
    }

    /// Underlying driver error, if any
    #[must_use]
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            Self::InvalidOptions(_) => None,
            Self::Open { source, .. }
            | Self::Start { source, .. }
            | Self::Stop { source, .. }
            | Self::Close { source, .. }
            | Self::Read { source, .. } => Some(source),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
