//! `knack say` - speak text through the text-to-speech ability

use crate::config::AppConfig;
use anyhow::{Context, Result};
use knack_core::{Runnable, StatusHandle};
use knack_speech::{detect_speaker, new_say_cmd, TextToSpeech};
use std::sync::Arc;
use tracing::info;

/// Dispatch one `cmd.say` to a freshly started runnable
pub async fn run(config: &AppConfig, text: String) -> Result<()> {
    let status = StatusHandle::new();
    let speaker = detect_speaker(&config.speech);
    let tts = TextToSpeech::from_config(&config.speech, Arc::new(status.clone()), speaker);

    status.start();
    info!(runnable = %tts.metadata().name, id = %tts.id(), "Speaking");
    let result = tts
        .on_message(&new_say_cmd(text).into())
        .await
        .context("Say command failed");
    status.stop();

    result
}
