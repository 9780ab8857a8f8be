pub mod api;
pub mod identity;
pub mod recorder;
pub mod sse;

pub use api::RoomClient;
pub use recorder::{Capture, EncodedAudio, LocalRecorder, RecorderPhase, RecordingUpload};
pub use sse::SseDecoder;
