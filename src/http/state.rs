use crate::relay::Relay;
use crate::room::{EventFanout, ParticipantRegistry, RecordingCoordinator};
use crate::storage::BlobStore;
use std::sync::Arc;

/// Shared application state for HTTP handlers.
///
/// Built once at startup and handed to every request; the process keeps
/// no other mutable globals. The participant registry and the fanout's
/// subscriber set are the only shared mutable state in the system.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ParticipantRegistry>,
    pub fanout: Arc<EventFanout>,
    pub relay: Arc<dyn Relay>,
    pub coordinator: Arc<RecordingCoordinator>,
    pub store: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(relay: Arc<dyn Relay>, store: Arc<dyn BlobStore>) -> Self {
        Self {
            registry: Arc::new(ParticipantRegistry::new()),
            fanout: Arc::new(EventFanout::default()),
            coordinator: Arc::new(RecordingCoordinator::new(Arc::clone(&relay))),
            relay,
            store,
        }
    }
}
