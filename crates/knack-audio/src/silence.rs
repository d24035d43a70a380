//! Silence detection on captured buffers
//!
//! Levels are normalized against the full scale of the bit depth, so a
//! threshold means the same thing at 16 and 32 bits.

/// Peak level of `samples`, 0.0 - 1.0
#[must_use]
pub fn peak_level(samples: &[i64], bit_depth: u32) -> f64 {
    let peak = samples
        .iter()
        .map(|s| s.unsigned_abs())
        .max()
        .unwrap_or(0);
    (peak as f64 / full_scale(bit_depth)).min(1.0)
}

/// Root-mean-square level of `samples`, 0.0 - 1.0
#[must_use]
pub fn rms_level(samples: &[i64], bit_depth: u32) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let scale = full_scale(bit_depth);
    let sum: f64 = samples
        .iter()
        .map(|&s| {
            let v = s as f64 / scale;
            v * v
        })
        .sum();
    (sum / samples.len() as f64).sqrt().min(1.0)
}

/// Whether the RMS level of `samples` is at or below `max_silence_level`
#[must_use]
pub fn is_silent(samples: &[i64], bit_depth: u32, max_silence_level: f64) -> bool {
    rms_level(samples, bit_depth) <= max_silence_level
}

fn full_scale(bit_depth: u32) -> f64 {
    (1u64 << (bit_depth.clamp(1, 32) - 1)) as f64
}
