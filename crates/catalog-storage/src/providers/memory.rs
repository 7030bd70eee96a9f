//! In-memory object storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStorage;

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    content_type: String,
}

/// Process-local object store.
///
/// Clones share the same objects and counters, so a test can keep a
/// handle to inspect what the service wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStorage {
    objects: Arc<DashMap<String, StoredObject>>,
    puts: Arc<AtomicU64>,
}

impl MemoryObjectStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put_object` calls so far.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether an object exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Body and content type of the object under `key`.
    pub fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects
            .get(key)
            .map(|o| (o.body.clone(), o.content_type.clone()))
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        size: u64,
        content_type: &str,
    ) -> AppResult<()> {
        if key.is_empty() {
            return Err(AppError::validation("Object key must not be empty"));
        }
        if body.len() as u64 != size {
            return Err(AppError::validation(format!(
                "Declared size {size} does not match body length {}",
                body.len()
            )));
        }
        self.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        self.puts.fetch_add(1, Ordering::SeqCst);
        debug!(key, size_bytes = size, "Stored object in memory");
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        if key.is_empty() {
            return Err(AppError::validation("Object key must not be empty"));
        }
        // Deleting a missing key succeeds, as with S3.
        self.objects.remove(key);
        debug!(key, "Removed object from memory");
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        if !self.objects.contains_key(key) {
            return Err(AppError::not_found(format!("Object '{key}' not found")));
        }
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| AppError::validation(format!("Invalid presign TTL {ttl:?}")))?;
        let expires = (Utc::now() + ttl).timestamp();
        Ok(format!("memory://{key}?expires={expires}"))
    }
}
