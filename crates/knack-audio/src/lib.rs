//! Knack Audio - capture stream lifecycle
//!
//! This crate wraps a native audio stream in an explicit lifecycle:
//! - [`Stream`]: open → start → read/stop → close, with contextualized errors
//! - [`ResourceHandle`]: the exclusively owned native stream and its reusable buffer
//! - [`CaptureWorker`]: the blocking read loop on a dedicated thread
//! - [`silence`]: level and silence detection on captured buffers
//!
//! # Features
//!
//! - `cpal`: capture from real input devices through cpal
//!
//! # Usage
//!
//! ```rust,ignore
//! use knack_audio::{default_driver, Stream, StreamOptions};
//!
//! let driver = default_driver()?;
//! let mut stream = Stream::open(driver.as_ref(), StreamOptions::default())?;
//! stream.start()?;
//! let samples = stream.read()?;
//! stream.stop()?;
//! stream.close()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod capture;
pub mod driver;
pub mod error;
pub mod options;
pub mod silence;
pub mod stream;

#[cfg(feature = "cpal")]
pub mod cpal_driver;

pub use capture::{CaptureWorker, Chunk};
pub use driver::{AudioDriver, NativeStream, OpenParams};
pub use error::{DriverError, Error, ErrorKind, Result};
pub use options::StreamOptions;
pub use stream::{ResourceHandle, Stream, StreamState};

#[cfg(feature = "cpal")]
pub use cpal_driver::CpalDriver;

/// Driver for the default audio host.
///
/// Fails with [`DriverError::Unsupported`] when the crate was built without a
/// native backend.
pub fn default_driver() -> std::result::Result<Box<dyn AudioDriver>, DriverError> {
    #[cfg(feature = "cpal")]
    {
        Ok(Box::new(CpalDriver::new()))
    }

    #[cfg(not(feature = "cpal"))]
    {
        Err(DriverError::Unsupported(
            "built without an audio backend; enable the `cpal` feature".to_string(),
        ))
    }
}
