//! Builds the configured object storage adapter.

use std::sync::Arc;

use tracing::{info, warn};

use catalog_core::config::{StorageConfig, StorageProviderKind};
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStorage;

use crate::providers::MemoryObjectStorage;

/// Construct the adapter selected by `config.provider`.
///
/// Returns `None` for `provider = "none"`; the media catalog then reports
/// `StorageUnavailable` for operations that need the store.
pub async fn create_object_storage(
    config: &StorageConfig,
) -> AppResult<Option<Arc<dyn ObjectStorage>>> {
    match config.provider {
        StorageProviderKind::Disabled => {
            warn!("No object storage configured; uploads and deletes are disabled");
            Ok(None)
        }
        StorageProviderKind::Memory => {
            info!("Using in-memory object storage");
            Ok(Some(Arc::new(MemoryObjectStorage::new())))
        }
        StorageProviderKind::S3 => build_s3(config).await,
    }
}

#[cfg(feature = "s3")]
async fn build_s3(config: &StorageConfig) -> AppResult<Option<Arc<dyn ObjectStorage>>> {
    let storage = crate::providers::S3ObjectStorage::new(&config.s3).await?;
    Ok(Some(Arc::new(storage)))
}

#[cfg(not(feature = "s3"))]
async fn build_s3(_config: &StorageConfig) -> AppResult<Option<Arc<dyn ObjectStorage>>> {
    Err(catalog_core::AppError::configuration(
        "S3 storage requested but catalog-storage was built without the `s3` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_provider_yields_none() {
        let config = StorageConfig::default();
        assert!(create_object_storage(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_provider() {
        let config = StorageConfig {
            provider: StorageProviderKind::Memory,
            ..Default::default()
        };
        let storage = create_object_storage(&config).await.unwrap().unwrap();
        assert_eq!(storage.provider_type(), "memory");
    }
}
