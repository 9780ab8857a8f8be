pub mod memory;
pub mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One entry in the recording catalog.
///
/// The grouping convention embedded in `key` belongs to uploaders and
/// display code; this layer never parses or validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    pub size: u64,
}

/// A stored object read back from the bucket.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Metadata attached to an upload.
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    pub content_type: Option<String>,
    /// Server-assigned reference timestamp the uploader recorded
    /// against, stored verbatim for downstream offset computation.
    pub start_timestamp: Option<String>,
}

/// Key/value blob store holding the uploaded recordings.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store one object under `key`, replacing any previous object.
    async fn put(&self, key: &str, bytes: Bytes, metadata: ObjectMetadata) -> Result<()>;

    /// Fresh listing of every stored object.
    async fn list(&self) -> Result<Vec<CatalogEntry>>;

    /// Read one object back. `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>>;
}
