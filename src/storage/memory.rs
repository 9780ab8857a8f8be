use super::{BlobStore, CatalogEntry, ObjectMetadata, StoredObject};
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// In-memory store, used by the tests and for credential-free local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredBlob>>,
}

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Bytes,
    metadata: ObjectMetadata,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata recorded for `key`, if the object exists.
    pub async fn metadata(&self, key: &str) -> Option<ObjectMetadata> {
        let objects = self.objects.read().await;
        objects.get(key).map(|blob| blob.metadata.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Bytes, metadata: ObjectMetadata) -> Result<()> {
        let mut objects = self.objects.write().await;
        objects.insert(key.to_string(), StoredBlob { bytes, metadata });
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CatalogEntry>> {
        let objects = self.objects.read().await;
        let mut entries: Vec<CatalogEntry> = objects
            .iter()
            .map(|(key, blob)| CatalogEntry {
                key: key.clone(),
                size: blob.bytes.len() as u64,
            })
            .collect();
        // Lexicographic order, matching bucket listings.
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let objects = self.objects.read().await;
        Ok(objects.get(key).map(|blob| StoredObject {
            content_type: blob
                .metadata
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes: blob.bytes.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nope.webm").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_sorted_by_key() {
        let store = MemoryStore::new();
        store
            .put("b.webm", Bytes::from_static(b"bb"), ObjectMetadata::default())
            .await
            .unwrap();
        store
            .put("a.webm", Bytes::from_static(b"a"), ObjectMetadata::default())
            .await
            .unwrap();

        let entries = store.list().await.unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry {
                    key: "a.webm".to_string(),
                    size: 1,
                },
                CatalogEntry {
                    key: "b.webm".to_string(),
                    size: 2,
                },
            ]
        );
    }

    #[tokio::test]
    async fn put_replaces_previous_object() {
        let store = MemoryStore::new();
        store
            .put("take.webm", Bytes::from_static(b"old"), ObjectMetadata::default())
            .await
            .unwrap();
        store
            .put(
                "take.webm",
                Bytes::from_static(b"new-bytes"),
                ObjectMetadata {
                    content_type: Some("audio/webm".to_string()),
                    start_timestamp: Some("1712000000000".to_string()),
                },
            )
            .await
            .unwrap();

        let object = store.get("take.webm").await.unwrap().unwrap();
        assert_eq!(object.bytes, Bytes::from_static(b"new-bytes"));
        assert_eq!(object.content_type, "audio/webm");
    }
}
