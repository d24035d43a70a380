//! Capture stream lifecycle
//!
//! ```text
//! open ──► Opened ──start──► Started ──stop──► Stopped ──start──► Started ...
//!            │                  │                 │
//!            └──────────────────┴─────close───────┴──► Closed (terminal)
//! ```
//!
//! State checks happen before the driver is called: `start`, `stop` and
//! `read` in the wrong state fail with their own error kind wrapping
//! [`DriverError::InvalidState`]. In particular `start` on a started stream
//! returns [`ErrorKind::StartFailed`](crate::ErrorKind::StartFailed).
//! `close` is accepted in every state and is a no-op once closed.

use crate::driver::{AudioDriver, NativeStream, OpenParams};
use crate::error::{DriverError, Error, Result};
use crate::options::StreamOptions;
use crate::silence;
use knack_core::InstanceId;
use std::fmt;
use tracing::{debug, warn};

/// Lifecycle state of a [`Stream`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Open, never started
    Opened,
    /// Capturing
    Started,
    /// Paused after a start
    Stopped,
    /// Native handle released
    Closed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened => write!(f, "opened"),
            Self::Started => write!(f, "started"),
            Self::Stopped => write!(f, "stopped"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Exclusively owned native stream plus the buffer it reads into.
///
/// The buffer is allocated once at open and reused by every read.
pub struct ResourceHandle {
    native: Box<dyn NativeStream>,
    buffer: Vec<i32>,
}

impl ResourceHandle {
    /// Allocate the buffer and open a native stream on the default device
    pub fn open(
        driver: &dyn AudioDriver,
        options: &StreamOptions,
    ) -> std::result::Result<Self, DriverError> {
        let buffer = vec![0; options.buffer_length];
        let native = driver.open_default_stream(&OpenParams::from(options))?;
        Ok(Self { native, buffer })
    }

    /// Start the native stream
    pub fn start(&mut self) -> std::result::Result<(), DriverError> {
        self.native.start()
    }

    /// Stop the native stream
    pub fn stop(&mut self) -> std::result::Result<(), DriverError> {
        self.native.stop()
    }

    /// Close the native stream, consuming the handle
    pub fn close(mut self) -> std::result::Result<(), DriverError> {
        self.native.close()
    }

    /// Fill the internal buffer and borrow it
    pub fn read(&mut self) -> std::result::Result<&[i32], DriverError> {
        self.native.read(&mut self.buffer)?;
        Ok(&self.buffer)
    }

    /// Buffer length in sample slots
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Audio capture stream with an explicit lifecycle
pub struct Stream {
    id: InstanceId,
    options: StreamOptions,
    state: StreamState,
    handle: Option<ResourceHandle>,
}

impl Stream {
    /// Open a stream on the driver's default device.
    ///
    /// The returned stream is [`StreamState::Opened`]; call [`Stream::start`]
    /// before reading.
    pub fn open(driver: &dyn AudioDriver, options: StreamOptions) -> Result<Self> {
        options.validate()?;

        let id = InstanceId::new();
        debug!(
            id = %id,
            driver = driver.name(),
            sample_rate = options.sample_rate,
            channels = options.num_input_channels,
            buffer_length = options.buffer_length,
            "Opening default stream"
        );

        let handle = ResourceHandle::open(driver, &options).map_err(|source| {
            warn!(id = %id, error = %source, "Opening default stream failed");
            Error::Open { id, source }
        })?;

        Ok(Self {
            id,
            options,
            state: StreamState::Opened,
            handle: Some(handle),
        })
    }

    /// Identity used in logs and errors
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Options the stream was opened with
    #[must_use]
    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    /// Bits per sample
    #[must_use]
    pub fn bit_depth(&self) -> u32 {
        self.options.bit_depth
    }

    /// Silence threshold
    #[must_use]
    pub fn max_silence_level(&self) -> f64 {
        self.options.max_silence_level
    }

    /// Number of captured channels
    #[must_use]
    pub fn num_channels(&self) -> u16 {
        self.options.num_input_channels
    }

    /// Sample rate in Hz
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.options.sample_rate
    }

    /// Samples returned by each read
    #[must_use]
    pub fn buffer_length(&self) -> usize {
        self.options.buffer_length
    }

    /// Start capturing. Valid from `Opened` or `Stopped`.
    pub fn start(&mut self) -> Result<()> {
        let id = self.id;
        debug!(id = %id, "Starting stream");

        let handle = self
            .handle_in(&[StreamState::Opened, StreamState::Stopped])
            .map_err(|source| {
                warn!(id = %id, error = %source, "Starting stream rejected");
                Error::Start { id, source }
            })?;
        handle.start().map_err(|source| {
            warn!(id = %id, error = %source, "Starting stream failed");
            Error::Start { id, source }
        })?;

        self.state = StreamState::Started;
        Ok(())
    }

    /// Pause capturing. Valid from `Started`.
    pub fn stop(&mut self) -> Result<()> {
        let id = self.id;
        debug!(id = %id, "Stopping stream");

        let handle = self
            .handle_in(&[StreamState::Started])
            .map_err(|source| {
                warn!(id = %id, error = %source, "Stopping stream rejected");
                Error::Stop { id, source }
            })?;
        handle.stop().map_err(|source| {
            warn!(id = %id, error = %source, "Stopping stream failed");
            Error::Stop { id, source }
        })?;

        self.state = StreamState::Stopped;
        Ok(())
    }

    /// Release the native stream. Valid in every state.
    ///
    /// The stream is `Closed` afterwards even when the driver reports a
    /// failure. Closing a closed stream does nothing.
    pub fn close(&mut self) -> Result<()> {
        let id = self.id;
        let Some(handle) = self.handle.take() else {
            debug!(id = %id, "Stream already closed");
            return Ok(());
        };

        debug!(id = %id, "Closing stream");
        self.state = StreamState::Closed;
        handle.close().map_err(|source| {
            warn!(id = %id, error = %source, "Closing stream failed");
            Error::Close { id, source }
        })
    }

    /// Block until one buffer is captured and return a copy of it.
    ///
    /// Valid from `Started`. Returns exactly [`Stream::buffer_length`] samples.
    pub fn read(&mut self) -> Result<Vec<i64>> {
        let id = self.id;
        let handle = self
            .handle_in(&[StreamState::Started])
            .map_err(|source| {
                warn!(id = %id, error = %source, "Reading from stream rejected");
                Error::Read { id, source }
            })?;

        let samples = handle.read().map_err(|source| {
            warn!(id = %id, error = %source, "Reading from stream failed");
            Error::Read { id, source }
        })?;

        Ok(samples.iter().map(|&s| i64::from(s)).collect())
    }

    /// Whether `samples` are at or below the configured silence level
    #[must_use]
    pub fn is_silent(&self, samples: &[i64]) -> bool {
        silence::is_silent(samples, self.options.bit_depth, self.options.max_silence_level)
    }

    fn handle_in(
        &mut self,
        allowed: &[StreamState],
    ) -> std::result::Result<&mut ResourceHandle, DriverError> {
        let state = self.state;
        match self.handle.as_mut() {
            Some(handle) if allowed.contains(&state) => Ok(handle),
            _ => Err(DriverError::InvalidState { state }),
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("options", &self.options)
            .finish()
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(id = %self.id, "Closing stream on drop");
            if let Err(e) = handle.close() {
                warn!(id = %self.id, error = %e, "Closing stream on drop failed");
            }
        }
    }
}
