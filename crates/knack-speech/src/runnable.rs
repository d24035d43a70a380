//! Text-to-speech runnable
//!
//! Handles `cmd.say` messages by handing the decoded text to a [`Speaker`].
//!
//! - Commands arriving while the runnable is not `Running` are dropped and
//!   reported as success. They are never queued.
//! - At most one `say` is in flight at a time. Callers on other tasks wait on
//!   the lock; the order in which they acquire it is not guaranteed.
//! - The status check happens before the lock, so a command that passed the
//!   check may still run after the status flips.

use crate::config::SpeechConfig;
use crate::error::{Error, Result, SpeakerError};
use crate::speaker::Speaker;
use async_trait::async_trait;
use knack_core::{
    BaseRunnable, Cmd, InstanceId, Message, Metadata, Runnable, Status, StatusSource,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Name of the say command
pub const CMD_SAY: &str = "cmd.say";

/// Build a `cmd.say` command for `text`
#[must_use]
pub fn new_say_cmd(text: impl Into<String>) -> Cmd {
    Cmd::new(CMD_SAY, text.into())
}

/// Decode the text of a `cmd.say` message
pub fn parse_say_payload(message: &Message) -> serde_json::Result<String> {
    message.decode_payload()
}

/// Runnable speaking the text of `cmd.say` commands
pub struct TextToSpeech {
    base: BaseRunnable,
    lock: Mutex<()>,
    speaker: Arc<dyn Speaker>,
    timeout: Option<Duration>,
}

impl TextToSpeech {
    /// Create a runnable named `name`, gated on `status` and speaking through `speaker`
    pub fn new(
        name: impl Into<String>,
        status: Arc<dyn StatusSource>,
        speaker: Arc<dyn Speaker>,
    ) -> Self {
        let metadata = Metadata::new(name, "Speaks the text of say commands");
        let base = BaseRunnable::new(metadata, status);
        info!(
            runnable = %base.name(),
            id = %base.id(),
            speaker = %speaker.name(),
            "Text-to-speech runnable created"
        );
        Self {
            base,
            lock: Mutex::new(()),
            speaker,
            timeout: None,
        }
    }

    /// Create from configuration
    pub fn from_config(
        config: &SpeechConfig,
        status: Arc<dyn StatusSource>,
        speaker: Arc<dyn Speaker>,
    ) -> Self {
        Self::new(config.name.clone(), status, speaker).with_timeout(config.timeout())
    }

    /// Bound every `say` by `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Speaker in use
    #[must_use]
    pub fn speaker(&self) -> &Arc<dyn Speaker> {
        &self.speaker
    }

    async fn on_say(&self, message: &Message) -> Result<()> {
        let status = self.base.status();
        if status != Status::Running {
            debug!(
                runnable = %self.base.name(),
                id = %self.base.id(),
                %status,
                "Dropping say command, not running"
            );
            return Ok(());
        }

        let text = parse_say_payload(message).map_err(|source| Error::PayloadDecode {
            runnable: self.base.name().to_string(),
            source,
        })?;

        let _guard = self.lock.lock().await;
        debug!(runnable = %self.base.name(), id = %self.base.id(), text = %text, "Saying");

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.speaker.say(&text))
                .await
                .unwrap_or(Err(SpeakerError::Timeout(limit))),
            None => self.speaker.say(&text).await,
        };

        result.map_err(|source| {
            warn!(
                runnable = %self.base.name(),
                id = %self.base.id(),
                error = %source,
                "Say failed"
            );
            Error::Action {
                runnable: self.base.name().to_string(),
                source,
            }
        })
    }
}

#[async_trait]
impl Runnable for TextToSpeech {
    type Error = Error;

    fn metadata(&self) -> &Metadata {
        self.base.metadata()
    }

    fn id(&self) -> InstanceId {
        self.base.id()
    }

    fn status(&self) -> Status {
        self.base.status()
    }

    async fn on_message(&self, message: &Message) -> Result<()> {
        match message.name.as_str() {
            CMD_SAY => self.on_say(message).await,
            other => {
                debug!(runnable = %self.base.name(), command = other, "Ignoring unknown command");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for TextToSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextToSpeech")
            .field("base", &self.base)
            .field("speaker", &self.speaker.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
