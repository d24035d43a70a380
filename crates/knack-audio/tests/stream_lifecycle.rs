//! Stream lifecycle against a recording driver

mod common;

use common::{Call, ToneDriver};
use knack_audio::{ErrorKind, Stream, StreamOptions, StreamState};

fn options(bit_depth: u32) -> StreamOptions {
    StreamOptions::default()
        .with_bit_depth(bit_depth)
        .with_buffer_length(128)
        .with_sample_rate(16000)
}

#[test]
fn test_full_lifecycle_call_order() {
    let driver = ToneDriver::new();
    let mut stream = Stream::open(&driver, options(16)).unwrap();

    stream.start().unwrap();
    stream.read().unwrap();
    stream.stop().unwrap();
    stream.start().unwrap();
    stream.read().unwrap();
    stream.stop().unwrap();
    stream.close().unwrap();

    let calls = driver.calls();
    assert!(matches!(calls[0], Call::Open(p) if p.frames_per_buffer == 128));
    assert_eq!(
        &calls[1..],
        &[
            Call::Start,
            Call::Read(128),
            Call::Stop,
            Call::Start,
            Call::Read(128),
            Call::Stop,
            Call::Close,
        ]
    );
}

#[test]
fn test_samples_fit_bit_depth() {
    for bit_depth in [8u32, 16, 24, 32] {
        let driver = ToneDriver::new();
        let mut stream = Stream::open(&driver, options(bit_depth)).unwrap();
        stream.start().unwrap();

        let min = -(1i64 << (bit_depth - 1));
        let max = (1i64 << (bit_depth - 1)) - 1;
        for _ in 0..4 {
            let samples = stream.read().unwrap();
            assert_eq!(samples.len(), stream.buffer_length());
            assert!(samples.iter().all(|s| (min..=max).contains(s)));
        }

        stream.close().unwrap();
    }
}

#[test]
fn test_tone_is_not_silent() {
    let driver = ToneDriver::new();
    let mut stream = Stream::open(&driver, options(16)).unwrap();
    stream.start().unwrap();

    let samples = stream.read().unwrap();
    assert!(!stream.is_silent(&samples));
    stream.close().unwrap();
}

#[test]
fn test_close_after_close_never_panics() {
    let driver = ToneDriver {
        fail_close: true,
        ..ToneDriver::default()
    };
    let mut stream = Stream::open(&driver, options(16)).unwrap();
    stream.start().unwrap();

    assert_eq!(stream.close().unwrap_err().kind(), ErrorKind::CloseFailed);
    assert!(stream.close().is_ok());
    assert_eq!(stream.state(), StreamState::Closed);

    // The native close was attempted exactly once
    let closes = driver
        .calls()
        .into_iter()
        .filter(|c| *c == Call::Close)
        .count();
    assert_eq!(closes, 1);
}

#[test]
fn test_dropping_unclosed_stream_releases_handle() {
    let driver = ToneDriver::new();
    {
        let mut stream = Stream::open(&driver, options(16)).unwrap();
        stream.start().unwrap();
    }
    assert_eq!(driver.calls().last(), Some(&Call::Close));
}

#[test]
fn test_streams_have_distinct_ids() {
    let driver = ToneDriver::new();
    let mut a = Stream::open(&driver, options(16)).unwrap();
    let mut b = Stream::open(&driver, options(16)).unwrap();
    assert_ne!(a.id(), b.id());
    a.close().unwrap();
    b.close().unwrap();
}
