//! Speech configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Text-to-speech ability configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Runnable name
    #[serde(default = "default_name")]
    pub name: String,

    /// Synthesis binary; auto-detected on `PATH` when unset
    #[serde(default)]
    pub engine_bin: Option<PathBuf>,

    /// Engine voice (e.g. `en-us` for espeak, `Samantha` for say)
    #[serde(default)]
    pub voice: Option<String>,

    /// Speaking rate
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Upper bound on a single `say`, 0 disables the limit
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_name() -> String {
    "text_to_speech".to_string()
}

fn default_words_per_minute() -> u32 {
    160
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            engine_bin: None,
            voice: None,
            words_per_minute: default_words_per_minute(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Set the engine binary
    #[must_use]
    pub fn with_engine_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.engine_bin = Some(bin.into());
        self
    }

    /// Set the voice
    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    /// Timeout for a single `say`, if any
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}
