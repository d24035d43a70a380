//! CLI module for Knack
//!
//! Provides commands:
//! - `capture`: record from the default input device and report levels
//! - `say`: speak text through the text-to-speech ability
//! - `devices`: list capture devices

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod capture;
pub mod devices;
pub mod say;

/// Knack CLI
#[derive(Parser, Debug)]
#[command(name = "knack")]
#[command(about = "Pluggable abilities driven by command messages")]
#[command(version)]
pub struct Cli {
    /// Extra configuration file, applied over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture audio and report levels
    Capture {
        /// Seconds to capture
        #[arg(long, default_value_t = 5)]
        seconds: u64,
    },
    /// Speak text
    Say {
        /// Text to speak
        text: String,
    },
    /// List capture devices
    Devices,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let config = crate::config::load_config(cli.config.as_deref())?;
    match command {
        Commands::Capture { seconds } => capture::run(&config, seconds).await,
        Commands::Say { text } => say::run(&config, text).await,
        Commands::Devices => devices::run(),
    }
}
