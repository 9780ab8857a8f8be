use super::recorder::RecordingUpload;
use super::sse::SseDecoder;
use crate::room::events::{RecordAction, RoomEvent};
use crate::storage::CatalogEntry;
use anyhow::{Context, Result};
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::multipart;
use serde_json::json;
use tracing::{info, warn};

/// HTTP client for one participant talking to the coordination server.
pub struct RoomClient {
    http: reqwest::Client,
    base_url: String,
}

impl RoomClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Announce or change this participant's display name.
    pub async fn set_name(&self, id: &str, name: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/name-change", self.base_url))
            .json(&json!({ "id": id, "name": name }))
            .send()
            .await
            .context("Failed to send name change")?;
        response.error_for_status().context("Name change rejected")?;
        Ok(())
    }

    /// Ask the server to broadcast a start or stop command to the room.
    /// Confirmation arrives on the event stream, not in this response.
    pub async fn broadcast_record(&self, action: RecordAction) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/broadcast-record", self.base_url))
            .json(&json!({ "action": action }))
            .send()
            .await
            .context("Failed to send record command")?;
        response
            .error_for_status()
            .context("Record command rejected")?;
        Ok(())
    }

    /// Upload a finished recording; the server rebroadcasts a catalog
    /// update to the whole room.
    pub async fn upload(&self, upload: RecordingUpload) -> Result<()> {
        let part = multipart::Part::bytes(upload.audio.bytes)
            .file_name(upload.filename.clone())
            .mime_str(&upload.audio.content_type)
            .context("Invalid recording content type")?;
        let mut form = multipart::Form::new().part("file", part);
        if let Some(timestamp) = upload.start_timestamp {
            form = form.text("startTimestamp", timestamp.to_string());
        }

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("Failed to upload recording")?;
        response.error_for_status().context("Upload rejected")?;

        info!(key = %upload.filename, "recording uploaded");
        Ok(())
    }

    /// Current recording catalog.
    pub async fn files(&self) -> Result<Vec<CatalogEntry>> {
        let response = self
            .http
            .get(format!("{}/files", self.base_url))
            .send()
            .await
            .context("Failed to query catalog")?;
        response
            .error_for_status()
            .context("Catalog query rejected")?
            .json()
            .await
            .context("Invalid catalog payload")
    }

    /// Open the live event stream. Yields every event broadcast after
    /// the subscription is established; ends when the transport closes.
    pub async fn events(&self) -> Result<BoxStream<'static, RoomEvent>> {
        let response = self
            .http
            .get(format!("{}/events", self.base_url))
            .send()
            .await
            .context("Failed to open event stream")?;
        let response = response
            .error_for_status()
            .context("Event stream rejected")?;

        let stream = response
            .bytes_stream()
            .scan(SseDecoder::new(), |decoder, chunk| {
                let batch = match chunk {
                    Ok(bytes) => decoder.feed(&bytes),
                    Err(e) => {
                        warn!("Event stream transport error: {}", e);
                        return futures::future::ready(None);
                    }
                };
                futures::future::ready(Some(futures::stream::iter(batch)))
            })
            .flatten();

        Ok(stream.boxed())
    }
}
