//! Capture loop on a dedicated thread
//!
//! `Stream::read` blocks on the driver, so it must never run on an async
//! executor thread. [`CaptureWorker`] owns a started stream on its own OS
//! thread, reads buffer after buffer and forwards them over a bounded tokio
//! channel. When the consumer falls behind, chunks are dropped rather than
//! stalling the device. Read errors are always delivered.
//!
//! Stopping is cooperative: the flag is checked between reads and an
//! in-flight read is never interrupted.

use crate::error::Result;
use crate::silence;
use crate::stream::Stream;
use knack_core::InstanceId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

/// Default number of chunks buffered between the capture thread and the consumer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// One captured buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Samples, exactly one stream buffer
    pub samples: Vec<i64>,
    /// RMS level normalized to the stream's bit depth
    pub level: f64,
    /// Whether the level is at or below the stream's silence threshold
    pub silent: bool,
}

/// Owns a stream and runs its read loop on a dedicated thread
pub struct CaptureWorker {
    id: InstanceId,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<Stream>>,
}

impl CaptureWorker {
    /// Move `stream` onto a capture thread.
    ///
    /// The stream should already be started; otherwise the first read fails
    /// and the error is delivered on the channel. The loop ends on the first
    /// read error, when the receiver is dropped, or on [`CaptureWorker::stop`].
    pub fn spawn(stream: Stream, capacity: usize) -> (Self, mpsc::Receiver<Result<Chunk>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let stop = Arc::new(AtomicBool::new(false));
        let id = stream.id();

        let stop_flag = stop.clone();
        let thread = std::thread::spawn(move || run_capture_loop(stream, stop_flag, tx));

        info!(id = %id, "Capture worker started");
        (
            Self {
                id,
                stop,
                thread: Some(thread),
            },
            rx,
        )
    }

    /// Identity of the captured stream
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Whether the capture thread is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }

    /// Signal the loop, wait for the current read to finish, and return the
    /// stream so the caller can stop and close it.
    ///
    /// Blocks the calling thread for up to one buffer duration.
    pub fn stop(mut self) -> Option<Stream> {
        self.stop.store(true, Ordering::SeqCst);
        let thread = self.thread.take()?;
        match thread.join() {
            Ok(stream) => {
                info!(id = %self.id, "Capture worker stopped");
                Some(stream)
            }
            Err(_) => {
                error!(id = %self.id, "Capture thread panicked");
                None
            }
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        // Detach; the loop exits at the next read and the stream closes on drop
        self.stop.store(true, Ordering::SeqCst);
    }
}

fn run_capture_loop(
    mut stream: Stream,
    stop: Arc<AtomicBool>,
    tx: mpsc::Sender<Result<Chunk>>,
) -> Stream {
    let bit_depth = stream.bit_depth();
    let max_silence_level = stream.max_silence_level();
    let mut chunks = 0u64;
    let mut dropped = 0u64;

    while !stop.load(Ordering::SeqCst) {
        match stream.read() {
            Ok(samples) => {
                let level = silence::rms_level(&samples, bit_depth);
                let chunk = Chunk {
                    samples,
                    level,
                    silent: level <= max_silence_level,
                };
                match tx.try_send(Ok(chunk)) {
                    Ok(()) => chunks += 1,
                    Err(TrySendError::Full(_)) => {
                        dropped += 1;
                        if dropped.is_power_of_two() {
                            warn!(
                                id = %stream.id(),
                                dropped,
                                "Capture consumer lagging, dropping chunks"
                            );
                        }
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!(id = %stream.id(), "Capture receiver dropped");
                        break;
                    }
                }
            }
            Err(e) => {
                error!(id = %stream.id(), error = %e, "Capture loop stopped on read error");
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }

    debug!(id = %stream.id(), chunks, dropped, "Capture loop exited");
    stream
}
