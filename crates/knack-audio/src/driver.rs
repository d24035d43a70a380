//! Native audio driver capability
//!
//! A driver opens native streams; a native stream exposes the raw
//! start/stop/close/read primitives. [`crate::Stream`] owns one native stream
//! and adds state tracking, identity and error context on top.

use crate::error::DriverError;
use crate::options::StreamOptions;

/// Parameters handed to the driver when opening a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenParams {
    /// Input channels
    pub num_input_channels: u16,
    /// Output channels
    pub num_output_channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Sample slots per buffer (interleaved across channels)
    pub frames_per_buffer: usize,
    /// Bits per sample the driver must scale samples to
    pub bit_depth: u32,
}

impl From<&StreamOptions> for OpenParams {
    fn from(options: &StreamOptions) -> Self {
        Self {
            num_input_channels: options.num_input_channels,
            num_output_channels: options.num_output_channels,
            sample_rate: options.sample_rate,
            frames_per_buffer: options.buffer_length,
            bit_depth: options.bit_depth,
        }
    }
}

/// Opens native streams
#[cfg_attr(test, mockall::automock)]
pub trait AudioDriver: Send + Sync {
    /// Driver name, for logs
    fn name(&self) -> &str;

    /// Open a stream on the default device. The stream is returned stopped.
    fn open_default_stream(
        &self,
        params: &OpenParams,
    ) -> Result<Box<dyn NativeStream>, DriverError>;

    /// Names of the capture devices the driver can see
    fn devices(&self) -> Result<Vec<String>, DriverError> {
        Ok(Vec::new())
    }
}

/// An open native stream.
///
/// Implementations are driven by a single owner; none of these methods is
/// called concurrently with another.
#[cfg_attr(test, mockall::automock)]
pub trait NativeStream: Send {
    /// Begin capturing
    fn start(&mut self) -> Result<(), DriverError>;

    /// Pause capturing
    fn stop(&mut self) -> Result<(), DriverError>;

    /// Release the native resources. The stream is unusable afterwards.
    fn close(&mut self) -> Result<(), DriverError>;

    /// Block until `buffer` is completely filled with new samples
    fn read(&mut self, buffer: &mut [i32]) -> Result<(), DriverError>;
}
