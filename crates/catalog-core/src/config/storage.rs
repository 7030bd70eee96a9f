//! Object storage configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which object storage adapter backs the media catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// S3-compatible object store.
    S3,
    /// Process-local in-memory store.
    Memory,
    /// No object store configured.
    #[default]
    #[serde(rename = "none")]
    Disabled,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Adapter to construct.
    #[serde(default)]
    pub provider: StorageProviderKind,
    /// Default lifetime of presigned download URLs, in seconds.
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_seconds: u64,
    /// Maximum upload size in bytes (default 50 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl StorageConfig {
    /// Default presigned URL lifetime as a [`Duration`].
    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_seconds)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::default(),
            presign_ttl_seconds: default_presign_ttl(),
            max_upload_size_bytes: default_max_upload(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO). Empty for AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Access key ID. Empty to use the default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (`{endpoint}/{bucket}/{key}`).
    #[serde(default)]
    pub use_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: default_bucket(),
            access_key: String::new(),
            secret_key: String::new(),
            use_path_style: false,
        }
    }
}

fn default_presign_ttl() -> u64 {
    900
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MiB
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket() -> String {
    "content-media".to_string()
}
