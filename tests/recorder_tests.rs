use async_trait::async_trait;
use greenroom::client::{Capture, EncodedAudio, LocalRecorder, RecorderPhase};
use greenroom::room::{RecordAction, RoomEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Capture double standing in for the local microphone pipeline.
struct FakeCapture {
    started: Arc<AtomicUsize>,
}

impl FakeCapture {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let started = Arc::new(AtomicUsize::new(0));
        (
            Self {
                started: Arc::clone(&started),
            },
            started,
        )
    }
}

#[async_trait]
impl Capture for FakeCapture {
    type Handle = usize;

    async fn start(&self) -> anyhow::Result<usize> {
        Ok(self.started.fetch_add(1, Ordering::SeqCst))
    }

    async fn stop(&self, handle: usize) -> anyhow::Result<EncodedAudio> {
        Ok(EncodedAudio {
            bytes: format!("take-{}", handle).into_bytes(),
            content_type: "audio/webm".to_string(),
        })
    }
}

fn start_event(timestamp: i64) -> RoomEvent {
    RoomEvent::RecordCommand {
        action: RecordAction::Start,
        timestamp: Some(timestamp),
    }
}

fn stop_event() -> RoomEvent {
    RoomEvent::RecordCommand {
        action: RecordAction::Stop,
        timestamp: None,
    }
}

#[tokio::test]
async fn pending_then_recording_on_server_confirmation() {
    let (capture, started) = FakeCapture::new();
    let mut recorder = LocalRecorder::new(capture, "alice");
    assert_eq!(recorder.phase(), RecorderPhase::Idle);

    recorder.on_start_requested();
    assert_eq!(recorder.phase(), RecorderPhase::Pending);
    // Feedback only; capture waits for the server's broadcast.
    assert_eq!(started.load(Ordering::SeqCst), 0);

    recorder.on_event(&start_event(1712000000000)).await.unwrap();
    assert_eq!(recorder.phase(), RecorderPhase::Recording);
    assert_eq!(started.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn request_failure_while_pending_reverts_to_idle() {
    let (capture, started) = FakeCapture::new();
    let mut recorder = LocalRecorder::new(capture, "alice");

    recorder.on_start_requested();
    recorder.on_request_failed();
    assert_eq!(recorder.phase(), RecorderPhase::Idle);
    assert_eq!(started.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stop_produces_upload_carrying_server_timestamp() {
    let (capture, _started) = FakeCapture::new();
    let mut recorder = LocalRecorder::new(capture, "alice");

    recorder.on_start_requested();
    recorder.on_event(&start_event(1712000000000)).await.unwrap();

    let upload = recorder
        .on_event(&stop_event())
        .await
        .unwrap()
        .expect("a finished take");
    assert_eq!(recorder.phase(), RecorderPhase::Idle);
    assert_eq!(upload.start_timestamp, Some(1712000000000));
    assert_eq!(upload.audio.content_type, "audio/webm");
    assert_eq!(upload.filename, "recording_1712000000000_alice.webm");
}

#[tokio::test]
async fn server_driven_start_works_without_a_local_request() {
    // Another participant pressed start; this client is idle but must
    // begin capturing too.
    let (capture, started) = FakeCapture::new();
    let mut recorder = LocalRecorder::new(capture, "bob");

    recorder.on_event(&start_event(42)).await.unwrap();
    assert_eq!(recorder.phase(), RecorderPhase::Recording);
    assert_eq!(started.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_start_while_recording_is_ignored_locally() {
    let (capture, started) = FakeCapture::new();
    let mut recorder = LocalRecorder::new(capture, "alice");

    recorder.on_event(&start_event(100)).await.unwrap();
    recorder.on_event(&start_event(200)).await.unwrap();

    assert_eq!(started.load(Ordering::SeqCst), 1);

    // The first reference timestamp is the one kept.
    let upload = recorder.on_event(&stop_event()).await.unwrap().unwrap();
    assert_eq!(upload.start_timestamp, Some(100));
}

#[tokio::test]
async fn stop_while_idle_is_a_noop() {
    let (capture, _started) = FakeCapture::new();
    let mut recorder = LocalRecorder::new(capture, "alice");

    let upload = recorder.on_event(&stop_event()).await.unwrap();
    assert!(upload.is_none());
    assert_eq!(recorder.phase(), RecorderPhase::Idle);
}

#[tokio::test]
async fn unrelated_events_do_not_disturb_the_recorder() {
    let (capture, started) = FakeCapture::new();
    let mut recorder = LocalRecorder::new(capture, "alice");

    recorder.on_event(&RoomEvent::FilesUpdated).await.unwrap();
    recorder
        .on_event(&RoomEvent::NameChange {
            participants: HashMap::from([("u1".to_string(), "Alice".to_string())]),
        })
        .await
        .unwrap();

    assert_eq!(recorder.phase(), RecorderPhase::Idle);
    assert_eq!(started.load(Ordering::SeqCst), 0);
}
