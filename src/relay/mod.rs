pub mod local;
pub mod message;
pub mod nats;

pub use local::LocalRelay;
pub use message::RelayMessage;
pub use nats::NatsRelay;

use crate::room::fanout::EventFanout;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Publish/subscribe bus decoupling "a state-changing request arrived"
/// from "deliver to subscribers".
///
/// At-most-once delivery; ordering is preserved per publisher but not
/// across distinct publishers. Delivery has no failure mode visible to
/// publishers beyond the publish call's own I/O error.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Fire a message at every subscribed process, including this one.
    async fn publish(&self, message: RelayMessage) -> Result<()>;

    /// Open the message stream. Every message published after the
    /// subscription is established is delivered at most once; the
    /// stream ends when the underlying transport closes.
    async fn subscribe(&self) -> Result<BoxStream<'static, RelayMessage>>;
}

/// Spawn the single consumption point feeding the fanout.
///
/// Every HTTP-triggered mutation becomes observable by all subscribers,
/// including the mutation's own originator, because it travels through
/// here rather than being pushed at the fanout directly.
pub async fn spawn_pump(
    relay: Arc<dyn Relay>,
    fanout: Arc<EventFanout>,
) -> Result<JoinHandle<()>> {
    let mut messages = relay.subscribe().await?;
    Ok(tokio::spawn(async move {
        while let Some(message) = messages.next().await {
            fanout.broadcast(message.into_event());
        }
        info!("relay stream closed, fanout pump stopped");
    }))
}
