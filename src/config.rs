//! Application configuration
//!
//! Sources, lowest priority first:
//! 1. `config/default.toml`, embedded at build time
//! 2. `config/local.toml`, if present
//! 3. the file passed with `--config`
//! 4. `KNACK_*` environment variables

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat, Map};
use knack_audio::StreamOptions;
use knack_speech::SpeechConfig;
use serde::Deserialize;
use std::path::Path;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Capture stream options
    #[serde(default)]
    pub audio_input: StreamOptions,
    /// Text-to-speech ability
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Check values the type system cannot
    pub fn validate(&self) -> Result<()> {
        self.audio_input
            .validate()
            .context("Invalid [audio_input] configuration")
    }
}

/// Load configuration from files and the process environment
pub fn load_config(extra: Option<&Path>) -> Result<AppConfig> {
    load_config_with_env(extra, None)
}

/// Load configuration, reading `KNACK_*` variables from `env` instead of the
/// process environment when given
pub fn load_config_with_env(
    extra: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<AppConfig> {
    let mut builder = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/local").required(false));

    if let Some(path) = extra {
        builder = builder.add_source(File::from(path).required(true));
    }

    // prefix_separator("_") keeps KNACK_SPEECH__VOICE working; config 0.14
    // otherwise expects KNACK__SPEECH__VOICE
    let config = builder
        .add_source(
            Environment::with_prefix("KNACK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context("Failed to build configuration")?;

    let config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_embedded_defaults_match_code_defaults() {
        let config = load_config_with_env(None, env(&[])).unwrap();
        assert_eq!(config.audio_input, StreamOptions::default());
        assert_eq!(config.speech.name, "text_to_speech");
        assert_eq!(config.speech.words_per_minute, 160);
        assert_eq!(config.speech.timeout_ms, 20_000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[audio_input]\nsample_rate = 16000\nbit_depth = 16\n\n[speech]\nvoice = \"en-us\""
        )
        .unwrap();

        let config = load_config_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.audio_input.sample_rate, 16_000);
        assert_eq!(config.audio_input.bit_depth, 16);
        assert_eq!(config.audio_input.buffer_length, 512);
        assert_eq!(config.speech.voice.as_deref(), Some("en-us"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[audio_input]\nsample_rate = 16000").unwrap();

        let config = load_config_with_env(
            Some(file.path()),
            env(&[
                ("KNACK_AUDIO_INPUT__SAMPLE_RATE", "48000"),
                ("KNACK_SPEECH__TIMEOUT_MS", "0"),
            ]),
        )
        .unwrap();
        assert_eq!(config.audio_input.sample_rate, 48_000);
        assert_eq!(config.speech.timeout(), None);
    }

    #[test]
    fn test_invalid_stream_options_rejected() {
        let err = load_config_with_env(None, env(&[("KNACK_AUDIO_INPUT__BIT_DEPTH", "12")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("audio_input"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config_with_env(Some(Path::new("/no/such/knack.toml")), env(&[]));
        assert!(result.is_err());
    }
}
