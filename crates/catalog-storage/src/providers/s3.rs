//! S3-compatible object storage adapter.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{error, info};

use catalog_core::config::S3StorageConfig;
use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStorage;

/// Object storage backed by an S3-compatible service (AWS, MinIO, ...).
#[derive(Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
}

impl std::fmt::Debug for S3ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStorage")
            .field("bucket", &self.bucket)
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3ObjectStorage {
    /// Build a client from configuration.
    ///
    /// Static credentials are used when both keys are set, otherwise the
    /// default AWS provider chain applies.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.trim().is_empty() {
            return Err(AppError::configuration("S3 bucket must be configured"));
        }

        let endpoint = if config.endpoint.is_empty() {
            "aws"
        } else {
            config.endpoint.as_str()
        };
        info!(
            endpoint,
            region = %config.region,
            bucket = %config.bucket,
            path_style = config.use_path_style,
            "Initializing S3 object storage"
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.use_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }
        if !config.access_key.is_empty() && !config.secret_key.is_empty() {
            builder = builder.credentials_provider(Credentials::new(
                &config.access_key,
                &config.secret_key,
                None,
                None,
                "catalog-config",
            ));
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }

    fn require_key(key: &str) -> AppResult<()> {
        if key.is_empty() {
            return Err(AppError::validation("Object key must not be empty"));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        size: u64,
        content_type: &str,
    ) -> AppResult<()> {
        Self::require_key(key)?;
        let start = Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .content_length(size as i64)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    bucket = %self.bucket,
                    key,
                    size_bytes = size,
                    "S3 put failed"
                );
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    format!("Failed to store object '{key}'"),
                    e,
                )
            })?;

        info!(
            bucket = %self.bucket,
            key,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "S3 put succeeded"
        );
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        Self::require_key(key)?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, bucket = %self.bucket, key, "S3 delete failed");
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    format!("Failed to delete object '{key}'"),
                    e,
                )
            })?;

        info!(bucket = %self.bucket, key, "S3 delete succeeded");
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        Self::require_key(key)?;

        let presigning = PresigningConfig::builder()
            .expires_in(ttl)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Validation,
                    format!("Invalid presign TTL {ttl:?}"),
                    e,
                )
            })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    format!("Failed to presign object '{key}'"),
                    e,
                )
            })?;

        Ok(request.uri().to_string())
    }
}
