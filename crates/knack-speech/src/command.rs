//! Speech through a local synthesis CLI
//!
//! Supported engines, in detection order:
//! - espeak-ng
//! - espeak
//! - say (macOS)
//!
//! When none is installed, [`detect_speaker`] falls back to [`LogSpeaker`].

use crate::config::SpeechConfig;
use crate::error::SpeakerError;
use crate::speaker::{LogSpeaker, Speaker};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, warn};

const ENGINES: [&str; 3] = ["espeak-ng", "espeak", "say"];

/// Speaker running a synthesis binary per utterance
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    bin: PathBuf,
    name: String,
    voice: Option<String>,
    words_per_minute: u32,
}

impl CommandSpeaker {
    /// Create a speaker for `bin`
    #[must_use]
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        let bin = bin.into();
        let name = bin
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("tts")
            .to_string();
        Self {
            bin,
            name,
            voice: None,
            words_per_minute: 160,
        }
    }

    /// Set the voice
    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    /// Set the speaking rate
    #[must_use]
    pub fn with_words_per_minute(mut self, wpm: u32) -> Self {
        self.words_per_minute = wpm;
        self
    }

    /// Binary path
    #[must_use]
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Arguments passed to the engine for `text`
    #[must_use]
    pub fn args(&self, text: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let rate_flag = if self.name == "say" { "-r" } else { "-s" };
        if let Some(voice) = self.voice.as_deref().filter(|v| !v.is_empty()) {
            args.push("-v".into());
            args.push(voice.into());
        }
        let wpm = self.words_per_minute.clamp(80, 450);
        args.push(rate_flag.into());
        args.push(wpm.to_string().into());
        // Keep text that starts with '-' from being parsed as a flag
        args.push("--".into());
        args.push(text.into());
        args
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn say(&self, text: &str) -> Result<(), SpeakerError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let mut cmd = Command::new(&self.bin);
        cmd.args(self.args(text)).kill_on_drop(true);
        debug!(command = ?cmd, "Running {}", self.name);

        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(SpeakerError::Engine(format!(
                "{} failed ({}): {}",
                self.name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Pick a speaker for `config`: the configured binary, else the first engine
/// on `PATH`, else [`LogSpeaker`].
#[must_use]
pub fn detect_speaker(config: &SpeechConfig) -> Arc<dyn Speaker> {
    let bin = match &config.engine_bin {
        Some(bin) if !bin.as_os_str().is_empty() => {
            if let Some(found) = find_binary(bin) {
                Some(found)
            } else {
                warn!(bin = ?bin, "Configured TTS engine not found");
                None
            }
        }
        _ => ENGINES.iter().find_map(|name| find_binary(Path::new(name))),
    };

    match bin {
        Some(bin) => {
            info!(bin = ?bin, "Detected TTS engine");
            let mut speaker =
                CommandSpeaker::new(bin).with_words_per_minute(config.words_per_minute);
            if let Some(voice) = &config.voice {
                speaker = speaker.with_voice(voice.clone());
            }
            Arc::new(speaker)
        }
        None => {
            warn!("No TTS engine detected (espeak-ng/espeak/say missing)");
            Arc::new(LogSpeaker)
        }
    }
}

/// Resolve `bin` as a path, or by name on `PATH`
pub fn find_binary(bin: &Path) -> Option<PathBuf> {
    if bin.components().count() > 1 {
        return bin.exists().then(|| bin.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_espeak_args() {
        let speaker = CommandSpeaker::new("/usr/bin/espeak-ng")
            .with_voice("en-us")
            .with_words_per_minute(200);
        assert_eq!(speaker.name(), "espeak-ng");
        assert_eq!(
            strings(speaker.args("hello")),
            vec!["-v", "en-us", "-s", "200", "--", "hello"]
        );
    }

    #[test]
    fn test_say_uses_rate_flag() {
        let speaker = CommandSpeaker::new("/usr/bin/say");
        assert_eq!(strings(speaker.args("hi")), vec!["-r", "160", "--", "hi"]);
    }

    #[test]
    fn test_rate_is_clamped() {
        let speaker = CommandSpeaker::new("espeak").with_words_per_minute(10_000);
        assert!(strings(speaker.args("x")).contains(&"450".to_string()));
    }

    #[tokio::test]
    async fn test_engine_exit_status() {
        let (Some(ok), Some(fail)) = (
            find_binary(Path::new("true")),
            find_binary(Path::new("false")),
        ) else {
            return;
        };

        assert!(CommandSpeaker::new(ok).say("hello").await.is_ok());

        let err = CommandSpeaker::new(fail).say("hello").await.unwrap_err();
        assert!(matches!(err, SpeakerError::Engine(_)));
    }

    #[tokio::test]
    async fn test_empty_text_is_a_no_op() {
        let speaker = CommandSpeaker::new("/definitely/not/installed");
        assert!(speaker.say("   ").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let speaker = CommandSpeaker::new("/definitely/not/installed");
        let err = speaker.say("hello").await.unwrap_err();
        assert!(matches!(err, SpeakerError::Io(_)));
    }

    #[test]
    fn test_detect_falls_back_to_log_speaker() {
        let config = SpeechConfig::default().with_engine_bin("/definitely/not/installed");
        assert_eq!(detect_speaker(&config).name(), "log");
    }
}
