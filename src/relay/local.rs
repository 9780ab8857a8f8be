use super::message::RelayMessage;
use super::Relay;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::broadcast;
use tracing::warn;

const LOCAL_RELAY_CAPACITY: usize = 64;

/// Loopback relay for a single-process deployment.
///
/// Same contract as the NATS relay, including self-notification: the
/// publishing process's own subscription receives every message.
pub struct LocalRelay {
    tx: broadcast::Sender<RelayMessage>,
}

impl LocalRelay {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LOCAL_RELAY_CAPACITY);
        Self { tx }
    }
}

impl Default for LocalRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Relay for LocalRelay {
    async fn publish(&self, message: RelayMessage) -> Result<()> {
        // No subscribers yet is not an error.
        let _ = self.tx.send(message);
        Ok(())
    }

    async fn subscribe(&self) -> Result<BoxStream<'static, RelayMessage>> {
        let rx = self.tx.subscribe();
        let stream = futures::stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(message) => return Some((message, rx)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "local relay subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(Box::pin(stream))
    }
}
