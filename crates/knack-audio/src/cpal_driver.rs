//! Native capture through cpal
//!
//! Linux build note: cpal needs the ALSA development headers.
//! On Debian/Ubuntu:
//!   sudo apt-get install -y libasound2-dev pkg-config
//!
//! `cpal::Stream` is not `Send`, so each native stream lives on an owner
//! thread. [`CpalStream`] talks to it over a control channel; captured
//! samples arrive from the cpal callback over a bounded sample channel and
//! `read` blocks on that channel until the caller's buffer is full.

use crate::driver::{AudioDriver, NativeStream, OpenParams};
use crate::error::DriverError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SizedSample, StreamConfig};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Callback buffers queued before the oldest are dropped
const SAMPLE_QUEUE_DEPTH: usize = 256;

type Packet = Result<Vec<i32>, String>;
type Reply = SyncSender<Result<(), DriverError>>;

enum Control {
    Play(Reply),
    Pause(Reply),
    Close(Reply),
}

/// Driver backed by the default cpal host
#[derive(Debug, Default)]
pub struct CpalDriver;

impl CpalDriver {
    /// Create the driver
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AudioDriver for CpalDriver {
    fn name(&self) -> &str {
        "cpal"
    }

    fn open_default_stream(
        &self,
        params: &OpenParams,
    ) -> Result<Box<dyn NativeStream>, DriverError> {
        if params.num_input_channels == 0 {
            return Err(DriverError::Unsupported(
                "output-only streams are not supported".to_string(),
            ));
        }
        Ok(Box::new(CpalStream::open(*params)?))
    }

    fn devices(&self) -> Result<Vec<String>, DriverError> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| DriverError::Device(format!("Failed to list input devices: {}", e)))?;
        Ok(devices
            .map(|d| d.name().unwrap_or_else(|_| "<unnamed device>".to_string()))
            .collect())
    }
}

/// Native stream whose cpal stream lives on an owner thread
pub struct CpalStream {
    control: Sender<Control>,
    samples: Receiver<Packet>,
    pending: VecDeque<i32>,
    owner: Option<JoinHandle<()>>,
}

impl CpalStream {
    fn open(params: OpenParams) -> Result<Self, DriverError> {
        let (control_tx, control_rx) = mpsc::channel::<Control>();
        let (sample_tx, sample_rx) = mpsc::sync_channel::<Packet>(SAMPLE_QUEUE_DEPTH);
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), DriverError>>(1);

        let owner = std::thread::Builder::new()
            .name("knack-cpal".to_string())
            .spawn(move || {
                let stream = match build_stream(&params, sample_tx) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                run_owner(stream, control_rx);
            })
            .map_err(|e| DriverError::Backend(format!("Failed to spawn stream thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                control: control_tx,
                samples: sample_rx,
                pending: VecDeque::new(),
                owner: Some(owner),
            }),
            Ok(Err(e)) => {
                let _ = owner.join();
                Err(e)
            }
            Err(_) => {
                let _ = owner.join();
                Err(DriverError::Disconnected)
            }
        }
    }

    fn request(&self, make: fn(Reply) -> Control) -> Result<(), DriverError> {
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.control
            .send(make(reply_tx))
            .map_err(|_| DriverError::Disconnected)?;
        reply_rx.recv().map_err(|_| DriverError::Disconnected)?
    }
}

impl NativeStream for CpalStream {
    fn start(&mut self) -> Result<(), DriverError> {
        self.request(Control::Play)
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        self.request(Control::Pause)?;
        // Drop whatever the callback delivered before the pause took effect
        self.pending.clear();
        while self.samples.try_recv().is_ok() {}
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        let result = self.request(Control::Close);
        if let Some(owner) = self.owner.take() {
            if owner.join().is_err() {
                return Err(DriverError::Backend("stream thread panicked".to_string()));
            }
        }
        result
    }

    fn read(&mut self, buffer: &mut [i32]) -> Result<(), DriverError> {
        let mut filled = 0;
        while filled < buffer.len() {
            if self.pending.is_empty() {
                match self.samples.recv() {
                    Ok(Ok(samples)) => self.pending.extend(samples),
                    Ok(Err(message)) => return Err(DriverError::Backend(message)),
                    Err(_) => return Err(DriverError::Disconnected),
                }
            }
            while filled < buffer.len() {
                match self.pending.pop_front() {
                    Some(sample) => {
                        buffer[filled] = sample;
                        filled += 1;
                    }
                    None => break,
                }
            }
        }
        Ok(())
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.take() {
            let _ = self.request(Control::Close);
            let _ = owner.join();
        }
    }
}

fn run_owner(stream: cpal::Stream, control: Receiver<Control>) {
    while let Ok(message) = control.recv() {
        match message {
            Control::Play(reply) => {
                let result = stream
                    .play()
                    .map_err(|e| DriverError::Backend(format!("Failed to start stream: {}", e)));
                let _ = reply.send(result);
            }
            Control::Pause(reply) => {
                let result = stream
                    .pause()
                    .map_err(|e| DriverError::Backend(format!("Failed to pause stream: {}", e)));
                let _ = reply.send(result);
            }
            Control::Close(reply) => {
                drop(stream);
                let _ = reply.send(Ok(()));
                return;
            }
        }
    }
    debug!("Stream control channel closed, releasing cpal stream");
}

fn build_stream(
    params: &OpenParams,
    tx: SyncSender<Packet>,
) -> Result<cpal::Stream, DriverError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| DriverError::Device("No input device found".to_string()))?;

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    info!("Using input device: {}", device_name);

    let format = device
        .default_input_config()
        .map_err(|e| DriverError::Device(format!("Failed to get default config: {}", e)))?
        .sample_format();

    let frames = u32::try_from(params.frames_per_buffer).map_err(|_| {
        DriverError::Unsupported(format!(
            "buffer of {} frames exceeds the native frame count",
            params.frames_per_buffer
        ))
    })?;
    let mut config = StreamConfig {
        channels: params.num_input_channels,
        sample_rate: cpal::SampleRate(params.sample_rate),
        buffer_size: BufferSize::Fixed(frames),
    };
    let shift = 32 - params.bit_depth.clamp(1, 32);

    let stream = match build_for_format(&device, &config, format, shift, tx.clone()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(
                "Fixed buffer of {} frames rejected ({}), using device default",
                params.frames_per_buffer, e
            );
            config.buffer_size = BufferSize::Default;
            build_for_format(&device, &config, format, shift, tx)?
        }
    };

    // Some hosts start streams on creation; opened streams must be idle
    if let Err(e) = stream.pause() {
        debug!("Pausing freshly built stream failed: {}", e);
    }

    debug!(
        "Audio config: {} channels, {}Hz, {:?}",
        config.channels, config.sample_rate.0, format
    );
    Ok(stream)
}

fn build_for_format(
    device: &cpal::Device,
    config: &StreamConfig,
    format: SampleFormat,
    shift: u32,
    tx: SyncSender<Packet>,
) -> Result<cpal::Stream, DriverError> {
    match format {
        SampleFormat::I8 => build_input_stream::<i8>(device, config, shift, tx),
        SampleFormat::I16 => build_input_stream::<i16>(device, config, shift, tx),
        SampleFormat::I32 => build_input_stream::<i32>(device, config, shift, tx),
        SampleFormat::U8 => build_input_stream::<u8>(device, config, shift, tx),
        SampleFormat::U16 => build_input_stream::<u16>(device, config, shift, tx),
        SampleFormat::F32 => build_input_stream::<f32>(device, config, shift, tx),
        SampleFormat::F64 => build_input_stream::<f64>(device, config, shift, tx),
        other => Err(DriverError::Unsupported(format!(
            "sample format {:?}",
            other
        ))),
    }
}

/// Convert a device sample to `i32` full scale, then drop the low `shift`
/// bits so the result fits the configured bit depth.
fn scale_sample<T>(sample: T, shift: u32) -> i32
where
    T: cpal::Sample,
    i32: cpal::FromSample<T>,
{
    sample.to_sample::<i32>() >> shift
}

fn build_input_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    shift: u32,
    tx: SyncSender<Packet>,
) -> Result<cpal::Stream, DriverError>
where
    T: SizedSample + Send + 'static,
    i32: cpal::FromSample<T>,
{
    let err_tx = tx.clone();
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let samples = data.iter().map(|&s| scale_sample(s, shift)).collect();
                // Full queue means the reader fell behind; drop this buffer
                let _ = tx.try_send(Ok(samples));
            },
            move |err| {
                let _ = err_tx.try_send(Err(err.to_string()));
            },
            None,
        )
        .map_err(|e| DriverError::Backend(format!("Failed to build stream: {}", e)))
}
