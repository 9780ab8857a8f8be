use super::{BlobStore, CatalogEntry, ObjectMetadata, StoredObject};
use crate::config::StorageConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::info;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// S3-compatible object store holding the uploaded recordings.
///
/// Objects are session recordings, not bulk data: `get` buffers the
/// body and `list` reads a single page.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from the storage configuration. The bucket name
    /// and static credentials are required; a custom `endpoint` covers
    /// S3-compatible providers.
    pub async fn connect(cfg: &StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            cfg.access_key_id.clone(),
            cfg.secret_access_key.clone(),
            None,
            None,
            "greenroom-config",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &cfg.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let sdk_config = loader.load().await;

        info!(bucket = %cfg.bucket, "object store client ready");

        Ok(Self {
            client: Client::new(&sdk_config),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl BlobStore for S3Store {
    async fn put(&self, key: &str, bytes: Bytes, metadata: ObjectMetadata) -> Result<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(
                metadata
                    .content_type
                    .as_deref()
                    .unwrap_or(FALLBACK_CONTENT_TYPE),
            )
            .body(ByteStream::from(bytes));
        if let Some(timestamp) = metadata.start_timestamp {
            request = request.metadata("start-timestamp", timestamp);
        }

        request
            .send()
            .await
            .with_context(|| format!("Failed to store object {}", key))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<CatalogEntry>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .send()
            .await
            .context("Failed to list bucket contents")?;

        Ok(response
            .contents()
            .iter()
            .map(|object| CatalogEntry {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or(0) as u64,
            })
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    return Ok(None);
                }
                return Err(err).with_context(|| format!("Failed to read object {}", key));
            }
        };

        let content_type = response
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = response
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read body of object {}", key))?
            .into_bytes();

        Ok(Some(StoredObject {
            content_type,
            bytes,
        }))
    }
}
