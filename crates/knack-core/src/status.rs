//! Runnable status
//!
//! The status of a runnable is owned by whoever supervises it. Runnables only
//! read it through [`StatusSource`] to decide whether to act on a command.
//!
//! ## Usage
//!
//! ```ignore
//! let status = StatusHandle::new();
//!
//! // Give a read-only view to the runnable
//! let runnable = MyRunnable::new(Arc::new(status.clone()));
//!
//! // Supervisor drives transitions
//! status.start();
//! status.stop();
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Runnable status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Status {
    /// Created, never started
    Initial = 0,
    /// Accepting and executing commands
    Running = 1,
    /// Stopped by the supervisor
    Stopped = 2,
    /// Stopped after a failure
    Errored = 3,
}

impl Status {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Initial,
            1 => Self::Running,
            2 => Self::Stopped,
            _ => Self::Errored,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// Read-only view of a status owned elsewhere
pub trait StatusSource: Send + Sync {
    /// Current status
    fn status(&self) -> Status;

    /// Whether the current status is [`Status::Running`]
    fn is_running(&self) -> bool {
        self.status() == Status::Running
    }
}

/// Supervisor-side status cell.
///
/// Clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<AtomicU8>,
}

impl StatusHandle {
    /// Create a handle in [`Status::Initial`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_status(Status::Initial)
    }

    /// Create a handle with an explicit starting status
    #[must_use]
    pub fn with_status(status: Status) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(status as u8)),
        }
    }

    /// Set the status, returning the previous one
    pub fn set(&self, status: Status) -> Status {
        let previous = Status::from_u8(self.inner.swap(status as u8, Ordering::SeqCst));
        if previous != status {
            debug!(from = %previous, to = %status, "Status changed");
        }
        previous
    }

    /// Move to [`Status::Running`]
    pub fn start(&self) -> Status {
        self.set(Status::Running)
    }

    /// Move to [`Status::Stopped`]
    pub fn stop(&self) -> Status {
        self.set(Status::Stopped)
    }

    /// Move to [`Status::Errored`]
    pub fn fail(&self) -> Status {
        self.set(Status::Errored)
    }
}

impl Default for StatusHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSource for StatusHandle {
    fn status(&self) -> Status {
        Status::from_u8(self.inner.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        let handle = StatusHandle::new();
        assert_eq!(handle.status(), Status::Initial);
        assert!(!handle.is_running());

        assert_eq!(handle.start(), Status::Initial);
        assert!(handle.is_running());

        assert_eq!(handle.stop(), Status::Running);
        assert_eq!(handle.status(), Status::Stopped);

        handle.fail();
        assert_eq!(handle.status(), Status::Errored);
    }

    #[test]
    fn test_clones_share_state() {
        let supervisor = StatusHandle::new();
        let view: Arc<dyn StatusSource> = Arc::new(supervisor.clone());

        assert!(!view.is_running());
        supervisor.start();
        assert!(view.is_running());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Running.to_string(), "running");
        assert_eq!(Status::Errored.to_string(), "errored");
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&Status::Stopped).unwrap();
        assert_eq!(json, "\"stopped\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::Stopped);
    }
}
