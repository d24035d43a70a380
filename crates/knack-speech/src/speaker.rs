//! Speaker capability

use crate::error::SpeakerError;
use async_trait::async_trait;
use tracing::info;

/// Anything that can turn text into speech.
///
/// The text-to-speech runnable never calls `say` concurrently with itself,
/// so implementations need no locking of their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Engine name, for logs
    fn name(&self) -> &str;

    /// Speak `text`, returning once speech is done
    async fn say(&self, text: &str) -> Result<(), SpeakerError>;
}

/// Speaker that only logs the text.
///
/// Used when no synthesis engine is installed.
#[derive(Debug, Default, Clone)]
pub struct LogSpeaker;

#[async_trait]
impl Speaker for LogSpeaker {
    fn name(&self) -> &str {
        "log"
    }

    async fn say(&self, text: &str) -> Result<(), SpeakerError> {
        info!(text, "No TTS engine available, printing only");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_speaker_always_succeeds() {
        let speaker = LogSpeaker;
        assert_eq!(speaker.name(), "log");
        assert!(speaker.say("hello").await.is_ok());
        assert!(speaker.say("").await.is_ok());
    }
}
