pub mod client;
pub mod config;
pub mod http;
pub mod relay;
pub mod room;
pub mod storage;

pub use client::{Capture, LocalRecorder, RoomClient};
pub use config::Config;
pub use http::{create_router, AppState};
pub use relay::{LocalRelay, NatsRelay, Relay, RelayMessage};
pub use room::{
    EventFanout, Participant, ParticipantRegistry, RecordAction, RecordingCoordinator, RoomEvent,
};
pub use storage::{BlobStore, CatalogEntry, MemoryStore, S3Store};
