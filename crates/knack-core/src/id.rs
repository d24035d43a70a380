//! Instance identity

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identity assigned to a stream or runnable at construction.
///
/// Every lifecycle log line carries it so events from the same instance can be
/// correlated. `Display` renders a short token; `Debug` the full UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generate a fresh identity
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}
