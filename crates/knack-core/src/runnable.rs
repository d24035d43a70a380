//! Runnable abstraction
//!
//! A runnable is a named unit that receives command messages and performs a
//! bounded side effect. Concrete abilities embed a [`BaseRunnable`] for the
//! bookkeeping every runnable shares and implement [`Runnable::on_message`].

use crate::{InstanceId, Message, Status, StatusSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Descriptive metadata of a runnable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unique name within the runtime
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
}

impl Metadata {
    /// Create metadata
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A command-driven actor
#[async_trait]
pub trait Runnable: Send + Sync {
    /// Error returned when handling a message fails
    type Error: std::error::Error + Send + Sync + 'static;

    /// Metadata
    fn metadata(&self) -> &Metadata;

    /// Identity logged with every event of this runnable
    fn id(&self) -> InstanceId;

    /// Current status, as seen through the injected status source
    fn status(&self) -> Status;

    /// Handle one message. Unknown message names are ignored.
    async fn on_message(&self, message: &Message) -> Result<(), Self::Error>;
}

/// Shared runnable bookkeeping: metadata, identity, status view
#[derive(Clone)]
pub struct BaseRunnable {
    metadata: Metadata,
    id: InstanceId,
    status: Arc<dyn StatusSource>,
}

impl BaseRunnable {
    /// Create a base runnable reading its status from `status`
    #[must_use]
    pub fn new(metadata: Metadata, status: Arc<dyn StatusSource>) -> Self {
        Self {
            metadata,
            id: InstanceId::new(),
            status,
        }
    }

    /// Metadata
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Name from the metadata
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Identity
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> Status {
        self.status.status()
    }
}

impl std::fmt::Debug for BaseRunnable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseRunnable")
            .field("metadata", &self.metadata)
            .field("id", &self.id)
            .field("status", &self.status())
            .finish()
    }
}
