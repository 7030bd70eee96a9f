//! Object storage capability trait.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Capability interface over an S3-compatible object store.
///
/// The media catalog only ever needs these three operations. Implementations
/// live in `catalog-storage`; tests substitute doubles that count writes or
/// inject failures. Any error is terminal for the calling operation, no
/// retries are performed at this level.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Store `body` under `key`, overwriting any existing object.
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        size: u64,
        content_type: &str,
    ) -> AppResult<()>;

    /// Remove the object stored under `key`.
    async fn delete_object(&self, key: &str) -> AppResult<()>;

    /// Generate a credential-free GET URL for `key`, valid for `ttl`.
    async fn presigned_url(&self, key: &str, ttl: Duration) -> AppResult<String>;
}
