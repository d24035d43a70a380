//! `knack capture` - record from the default input device
//!
//! Runs the read loop on a [`CaptureWorker`] thread and reports a summary of
//! levels once the time is up or Ctrl-C is pressed.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use knack_audio::capture::DEFAULT_CHANNEL_CAPACITY;
use knack_audio::{default_driver, CaptureWorker, Stream, StreamState};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Capture for `seconds` and print level statistics
pub async fn run(config: &AppConfig, seconds: u64) -> Result<()> {
    let driver = default_driver().context("No audio backend available")?;
    let mut stream = Stream::open(driver.as_ref(), config.audio_input.clone())
        .context("Failed to open capture stream")?;
    stream.start().context("Failed to start capture stream")?;

    println!("\nKnack Capture");
    println!("{}", "-".repeat(40));
    println!("  Driver:      {}", driver.name());
    println!("  Stream:      {}", stream.id());
    println!("  Sample rate: {} Hz", stream.sample_rate());
    println!("  Channels:    {}", stream.num_channels());
    println!("  Bit depth:   {}", stream.bit_depth());
    println!("  Duration:    {seconds}s (Ctrl-C to stop early)");
    println!();

    let (worker, mut chunks) = CaptureWorker::spawn(stream, DEFAULT_CHANNEL_CAPACITY);

    let mut stats = LevelStats::default();
    let mut failure = None;
    let deadline = tokio::time::sleep(Duration::from_secs(seconds));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping capture");
                break;
            }
            chunk = chunks.recv() => match chunk {
                Some(Ok(chunk)) => {
                    debug!(level = chunk.level, silent = chunk.silent, "Chunk");
                    stats.record(chunk.level, chunk.silent);
                }
                Some(Err(e)) => {
                    failure = Some(e);
                    break;
                }
                None => break,
            },
        }
    }
    drop(chunks);

    // Joining waits for the in-flight read
    let stream = tokio::task::spawn_blocking(move || worker.stop())
        .await
        .context("Capture worker join failed")?;

    shut_down(stream, failure)?;

    stats.print();
    Ok(())
}

/// Stop and close the stream handed back by the worker.
///
/// A capture failure takes precedence over a close failure, which is then
/// only logged.
fn shut_down(stream: Option<Stream>, failure: Option<knack_audio::Error>) -> Result<()> {
    if let Some(mut stream) = stream {
        if stream.state() == StreamState::Started {
            if let Err(e) = stream.stop() {
                warn!(error = %e, "Stopping capture stream failed");
            }
        }
        if let Err(e) = stream.close() {
            if failure.is_none() {
                return Err(e).context("Failed to close capture stream");
            }
            warn!(error = %e, "Closing capture stream failed");
        }
    }

    match failure {
        Some(e) => Err(e).context("Capture failed"),
        None => Ok(()),
    }
}

#[derive(Debug, Default)]
struct LevelStats {
    chunks: u64,
    silent: u64,
    peak: f64,
    sum: f64,
}

impl LevelStats {
    fn record(&mut self, level: f64, silent: bool) {
        self.chunks += 1;
        if silent {
            self.silent += 1;
        }
        self.peak = self.peak.max(level);
        self.sum += level;
    }

    fn mean(&self) -> f64 {
        if self.chunks == 0 {
            0.0
        } else {
            self.sum / self.chunks as f64
        }
    }

    fn print(&self) {
        println!("  Chunks:      {}", self.chunks);
        println!("  Silent:      {}", self.silent);
        println!("  Mean level:  {:.4}", self.mean());
        println!("  Peak level:  {:.4}", self.peak);
    }
}
