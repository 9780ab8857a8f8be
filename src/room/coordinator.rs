use crate::relay::{Relay, RelayMessage};
use crate::room::events::RecordAction;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Turns a single start/stop command into a relay broadcast.
///
/// The server is the single source of truth for when recording
/// officially starts: the epoch time is captured exactly once here and
/// that value is what every subscriber receives. Clients align against
/// it rather than their own local clocks. Repeated starts are broadcast
/// independently; there is no session identity and no deduplication.
pub struct RecordingCoordinator {
    relay: Arc<dyn Relay>,
}

impl RecordingCoordinator {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self { relay }
    }

    /// Stamp the current server epoch time (milliseconds) and broadcast
    /// a start command carrying it.
    pub async fn request_start(&self) -> Result<i64> {
        let timestamp = Utc::now().timestamp_millis();
        info!(timestamp, "broadcasting record start");
        self.relay
            .publish(RelayMessage::RecordCommand {
                action: RecordAction::Start,
                timestamp: Some(timestamp),
            })
            .await?;
        Ok(timestamp)
    }

    /// Broadcast a stop command. Stop carries no timestamp.
    pub async fn request_stop(&self) -> Result<()> {
        info!("broadcasting record stop");
        self.relay
            .publish(RelayMessage::RecordCommand {
                action: RecordAction::Stop,
                timestamp: None,
            })
            .await
    }
}
