//! Capture worker driving a stream on its own thread

mod common;

use common::{Call, ToneDriver};
use knack_audio::{CaptureWorker, ErrorKind, Stream, StreamOptions, StreamState};

fn started_stream(driver: &ToneDriver) -> Stream {
    let options = StreamOptions::default()
        .with_bit_depth(16)
        .with_buffer_length(64)
        .with_sample_rate(8000);
    let mut stream = Stream::open(driver, options).unwrap();
    stream.start().unwrap();
    stream
}

#[tokio::test]
async fn test_worker_delivers_chunks_and_returns_stream() {
    let driver = ToneDriver::new();
    let stream = started_stream(&driver);
    let id = stream.id();

    let (worker, mut rx) = CaptureWorker::spawn(stream, 4);
    assert_eq!(worker.id(), id);

    for _ in 0..3 {
        let chunk = rx.recv().await.unwrap().unwrap();
        assert_eq!(chunk.samples.len(), 64);
        assert!(chunk.level > 0.0);
        assert!(!chunk.silent);
    }

    let mut stream = tokio::task::spawn_blocking(move || worker.stop())
        .await
        .unwrap()
        .expect("stream handed back");
    assert_eq!(stream.id(), id);
    assert_eq!(stream.state(), StreamState::Started);

    stream.stop().unwrap();
    stream.close().unwrap();
    assert_eq!(driver.calls().last(), Some(&Call::Close));
}

#[tokio::test]
async fn test_worker_forwards_read_error_and_ends() {
    let driver = ToneDriver {
        fail_read_at: Some(2),
        ..ToneDriver::default()
    };
    let stream = started_stream(&driver);

    let (worker, mut rx) = CaptureWorker::spawn(stream, 4);

    assert!(rx.recv().await.unwrap().is_ok());
    let err = rx.recv().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadFailed);
    assert!(rx.recv().await.is_none());

    let stream = tokio::task::spawn_blocking(move || worker.stop())
        .await
        .unwrap();
    assert!(stream.is_some());
}

#[tokio::test]
async fn test_worker_on_unstarted_stream_reports_error() {
    let driver = ToneDriver::new();
    let options = StreamOptions::default().with_buffer_length(32);
    let stream = Stream::open(&driver, options).unwrap();

    let (worker, mut rx) = CaptureWorker::spawn(stream, 1);
    let err = rx.recv().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadFailed);

    let mut stream = tokio::task::spawn_blocking(move || worker.stop())
        .await
        .unwrap()
        .unwrap();
    stream.close().unwrap();
}

#[tokio::test]
async fn test_dropping_receiver_ends_loop() {
    let driver = ToneDriver::new();
    let stream = started_stream(&driver);

    let (worker, rx) = CaptureWorker::spawn(stream, 1);
    drop(rx);

    let stream = tokio::task::spawn_blocking(move || worker.stop())
        .await
        .unwrap();
    assert!(stream.is_some());
}
