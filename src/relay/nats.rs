use super::message::RelayMessage;
use super::Relay;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{info, warn};

/// NATS-backed relay.
///
/// Each topic publishes to its own subject under a shared prefix and
/// the subscriber side uses a wildcard subscription, so multiple server
/// processes share one logical room without changing the fanout's
/// contract.
pub struct NatsRelay {
    client: async_nats::Client,
    subject_prefix: String,
}

impl NatsRelay {
    /// Connect to the NATS server.
    pub async fn connect(url: &str, subject_prefix: impl Into<String>) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject_prefix: subject_prefix.into(),
        })
    }
}

#[async_trait]
impl Relay for NatsRelay {
    async fn publish(&self, message: RelayMessage) -> Result<()> {
        let subject = format!("{}.{}", self.subject_prefix, message.topic());
        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject, payload.into())
            .await
            .context("Failed to publish relay message")?;

        Ok(())
    }

    async fn subscribe(&self) -> Result<BoxStream<'static, RelayMessage>> {
        let subject = format!("{}.>", self.subject_prefix);

        info!("Subscribing to relay messages on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to relay subjects")?;

        let stream = subscriber.filter_map(|msg| async move {
            match serde_json::from_slice::<RelayMessage>(&msg.payload) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("Dropping undecodable relay message: {}", e);
                    None
                }
            }
        });

        Ok(stream.boxed())
    }
}
