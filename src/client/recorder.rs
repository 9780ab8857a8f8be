use crate::room::events::{RecordAction, RoomEvent};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

/// An encoded recording produced by the local capture pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Opaque local audio capture pipeline.
///
/// Microphone acquisition and encoding live behind this seam; the
/// synchronization layer only starts it, stops it, and ships the blob.
#[async_trait]
pub trait Capture: Send + Sync {
    type Handle: Send;

    /// Begin capturing immediately.
    async fn start(&self) -> Result<Self::Handle>;

    /// Stop capturing and hand back the encoded blob.
    async fn stop(&self, handle: Self::Handle) -> Result<EncodedAudio>;
}

/// Client-side recording phase.
///
/// `Pending` is the window between a user-initiated start request and
/// the server's confirming broadcast, so the UI never shows "recording"
/// before capture has actually begun while still giving immediate
/// feedback that a request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    Idle,
    Pending,
    Recording,
}

/// A finished local recording, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingUpload {
    pub filename: String,
    pub audio: EncodedAudio,
    /// The server-assigned reference timestamp this recording started
    /// against, passed along as upload metadata so downstream consumers
    /// can compute per-recording offsets. Local start latency is not
    /// compensated.
    pub start_timestamp: Option<i64>,
}

/// Drives the local capture pipeline from room events.
pub struct LocalRecorder<C: Capture> {
    capture: C,
    participant_label: String,
    phase: RecorderPhase,
    handle: Option<C::Handle>,
    start_timestamp: Option<i64>,
}

impl<C: Capture> LocalRecorder<C> {
    pub fn new(capture: C, participant_label: impl Into<String>) -> Self {
        Self {
            capture,
            participant_label: participant_label.into(),
            phase: RecorderPhase::Idle,
            handle: None,
            start_timestamp: None,
        }
    }

    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    /// A start request went out; show feedback before the server
    /// confirms.
    pub fn on_start_requested(&mut self) {
        if self.phase == RecorderPhase::Idle {
            self.phase = RecorderPhase::Pending;
        }
    }

    /// The start request failed; fall back to idle.
    pub fn on_request_failed(&mut self) {
        if self.phase == RecorderPhase::Pending {
            self.phase = RecorderPhase::Idle;
        }
    }

    /// The server confirmed a start: begin capturing immediately and
    /// remember the reference timestamp for the eventual upload. A
    /// start received while already recording is ignored locally even
    /// though the server broadcasts repeats without dedup.
    pub async fn on_record_start(&mut self, timestamp: Option<i64>) -> Result<()> {
        if self.phase == RecorderPhase::Recording {
            return Ok(());
        }

        let handle = self.capture.start().await?;
        self.handle = Some(handle);
        self.start_timestamp = timestamp;
        self.phase = RecorderPhase::Recording;
        Ok(())
    }

    /// Finish capture and produce the upload. A stop while nothing is
    /// being captured only resets the phase.
    pub async fn on_record_stop(&mut self) -> Result<Option<RecordingUpload>> {
        let Some(handle) = self.handle.take() else {
            self.phase = RecorderPhase::Idle;
            return Ok(None);
        };

        let audio = self.capture.stop(handle).await?;
        let start_timestamp = self.start_timestamp.take();
        self.phase = RecorderPhase::Idle;

        let stamp = start_timestamp.unwrap_or_else(|| Utc::now().timestamp_millis());
        let filename = format!(
            "recording_{}_{}.{}",
            stamp,
            self.participant_label,
            extension_for(&audio.content_type)
        );

        Ok(Some(RecordingUpload {
            filename,
            audio,
            start_timestamp,
        }))
    }

    /// Route one live event through the state machine. Returns an
    /// upload when a stop completed a take.
    pub async fn on_event(&mut self, event: &RoomEvent) -> Result<Option<RecordingUpload>> {
        match event {
            RoomEvent::RecordCommand {
                action: RecordAction::Start,
                timestamp,
            } => {
                self.on_record_start(*timestamp).await?;
                Ok(None)
            }
            RoomEvent::RecordCommand {
                action: RecordAction::Stop,
                ..
            } => self.on_record_stop().await,
            _ => Ok(None),
        }
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "audio/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/wav" | "audio/x-wav" => "wav",
        _ => "bin",
    }
}
