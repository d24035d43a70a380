//! Shared test driver: produces a deterministic tone and records every
//! native call.

use knack_audio::{AudioDriver, DriverError, NativeStream, OpenParams};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(OpenParams),
    Start,
    Stop,
    Close,
    Read(usize),
}

#[derive(Clone, Default)]
pub struct ToneDriver {
    pub calls: Arc<Mutex<Vec<Call>>>,
    /// Fail the nth read (1-based)
    pub fail_read_at: Option<usize>,
    pub fail_close: bool,
}

impl ToneDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl AudioDriver for ToneDriver {
    fn name(&self) -> &str {
        "tone"
    }

    fn open_default_stream(
        &self,
        params: &OpenParams,
    ) -> Result<Box<dyn NativeStream>, DriverError> {
        self.calls.lock().unwrap().push(Call::Open(*params));
        Ok(Box::new(ToneStream {
            calls: self.calls.clone(),
            bit_depth: params.bit_depth,
            phase: 0,
            reads: 0,
            fail_read_at: self.fail_read_at,
            fail_close: self.fail_close,
        }))
    }
}

struct ToneStream {
    calls: Arc<Mutex<Vec<Call>>>,
    bit_depth: u32,
    phase: u64,
    reads: usize,
    fail_read_at: Option<usize>,
    fail_close: bool,
}

impl NativeStream for ToneStream {
    fn start(&mut self) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push(Call::Start);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push(Call::Stop);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push(Call::Close);
        if self.fail_close {
            return Err(DriverError::Backend("close refused".to_string()));
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [i32]) -> Result<(), DriverError> {
        self.reads += 1;
        self.calls.lock().unwrap().push(Call::Read(buffer.len()));
        if self.fail_read_at == Some(self.reads) {
            return Err(DriverError::Disconnected);
        }

        // Full-scale 440 Hz-ish sine at the configured depth
        let amplitude = ((1i64 << (self.bit_depth - 1)) - 1) as f64;
        for slot in buffer.iter_mut() {
            let t = self.phase as f64 / 16.0;
            *slot = (t.sin() * amplitude) as i32;
            self.phase += 1;
        }
        Ok(())
    }
}
