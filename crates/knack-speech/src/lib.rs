//! Knack Speech - text-to-speech ability
//!
//! This crate provides the text-to-speech runnable:
//! - [`Speaker`]: the capability that turns text into sound
//! - [`TextToSpeech`]: a [`knack_core::Runnable`] handling `cmd.say` commands
//! - [`CommandSpeaker`] / [`LogSpeaker`]: concrete speakers
//!
//! # Usage
//!
//! ```rust,no_run
//! use knack_core::{Runnable, StatusHandle};
//! use knack_speech::{detect_speaker, new_say_cmd, SpeechConfig, TextToSpeech};
//! use std::sync::Arc;
//!
//! # async fn run() -> knack_speech::Result<()> {
//! let config = SpeechConfig::default();
//! let status = StatusHandle::new();
//! let tts = TextToSpeech::from_config(&config, Arc::new(status.clone()), detect_speaker(&config));
//!
//! status.start();
//! tts.on_message(&new_say_cmd("Hello world").into()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod error;
pub mod runnable;
pub mod speaker;

pub use command::{detect_speaker, CommandSpeaker};
pub use config::SpeechConfig;
pub use error::{Error, ErrorKind, Result, SpeakerError};
pub use runnable::{new_say_cmd, parse_say_payload, TextToSpeech, CMD_SAY};
pub use speaker::{LogSpeaker, Speaker};
