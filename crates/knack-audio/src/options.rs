//! Stream options

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bit depths a stream can be configured with. Samples are held in `i32`.
pub const SUPPORTED_BIT_DEPTHS: [u32; 4] = [8, 16, 24, 32];

/// Largest buffer a stream accepts; native frame counts are `u32`
pub const MAX_BUFFER_LENGTH: usize = u32::MAX as usize;

/// Capture stream configuration, immutable once a stream is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Bits per sample
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u32,

    /// Sample slots read per `read()` call
    #[serde(default = "default_buffer_length")]
    pub buffer_length: usize,

    /// Normalized level (0.0 - 1.0) at or below which a buffer counts as silence
    #[serde(default = "default_max_silence_level")]
    pub max_silence_level: f64,

    /// Input channels
    #[serde(default = "default_input_channels")]
    pub num_input_channels: u16,

    /// Output channels
    #[serde(default)]
    pub num_output_channels: u16,

    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_bit_depth() -> u32 {
    32
}

fn default_buffer_length() -> usize {
    512
}

fn default_max_silence_level() -> f64 {
    0.01
}

fn default_input_channels() -> u16 {
    1
}

fn default_sample_rate() -> u32 {
    44100
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            bit_depth: default_bit_depth(),
            buffer_length: default_buffer_length(),
            max_silence_level: default_max_silence_level(),
            num_input_channels: default_input_channels(),
            num_output_channels: 0,
            sample_rate: default_sample_rate(),
        }
    }
}

impl StreamOptions {
    /// Set bit depth
    #[must_use]
    pub fn with_bit_depth(mut self, bit_depth: u32) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    /// Set buffer length
    #[must_use]
    pub fn with_buffer_length(mut self, buffer_length: usize) -> Self {
        self.buffer_length = buffer_length;
        self
    }

    /// Set the silence threshold
    #[must_use]
    pub fn with_max_silence_level(mut self, level: f64) -> Self {
        self.max_silence_level = level;
        self
    }

    /// Set input and output channel counts
    #[must_use]
    pub fn with_channels(mut self, input: u16, output: u16) -> Self {
        self.num_input_channels = input;
        self.num_output_channels = output;
        self
    }

    /// Set sample rate
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Check the invariants a stream relies on
    pub fn validate(&self) -> Result<()> {
        if self.buffer_length == 0 {
            return Err(Error::InvalidOptions(
                "buffer_length must be greater than 0".to_string(),
            ));
        }
        if self.buffer_length > MAX_BUFFER_LENGTH {
            return Err(Error::InvalidOptions(format!(
                "buffer_length {} exceeds {}",
                self.buffer_length, MAX_BUFFER_LENGTH
            )));
        }
        if self.sample_rate == 0 {
            return Err(Error::InvalidOptions(
                "sample_rate must be greater than 0".to_string(),
            ));
        }
        if self.num_input_channels == 0 && self.num_output_channels == 0 {
            return Err(Error::InvalidOptions(
                "at least one input or output channel is required".to_string(),
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(Error::InvalidOptions(format!(
                "bit_depth {} not in {:?}",
                self.bit_depth, SUPPORTED_BIT_DEPTHS
            )));
        }
        if !self.max_silence_level.is_finite() || self.max_silence_level < 0.0 {
            return Err(Error::InvalidOptions(format!(
                "max_silence_level {} must be a non-negative number",
                self.max_silence_level
            )));
        }
        Ok(())
    }
}
