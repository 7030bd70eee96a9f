//! Wiring of stores, object storage and services.

use std::sync::Arc;

use catalog_core::config::{AppConfig, FolderConfig, StorageConfig};
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStorage;
use catalog_database::repositories::{FolderRepository, MediaRepository, MemoryCatalogStore};
use catalog_database::{DatabasePool, FolderStore, MediaStore};
use catalog_storage::{MemoryObjectStorage, create_object_storage};

use crate::folder::{FolderService, TreeService};
use crate::media::MediaService;

/// The catalog's services, built over one set of stores.
#[derive(Debug, Clone)]
pub struct CatalogContext {
    /// Folder CRUD and delete guards.
    pub folders: FolderService,
    /// Tree expansion and ancestor paths.
    pub tree: TreeService,
    /// Content-addressed media.
    pub media: MediaService,
}

impl CatalogContext {
    /// Build the services over explicit stores.
    pub fn new(
        folder_store: Arc<dyn FolderStore>,
        media_store: Arc<dyn MediaStore>,
        storage: Option<Arc<dyn ObjectStorage>>,
        folders: &FolderConfig,
        storage_config: &StorageConfig,
    ) -> Self {
        Self {
            folders: FolderService::new(folder_store.clone(), folders.clone()),
            tree: TreeService::new(folder_store.clone()),
            media: MediaService::new(media_store, folder_store, storage, storage_config),
        }
    }

    /// PostgreSQL stores plus the configured object storage.
    pub async fn connect(config: &AppConfig, pool: &DatabasePool) -> AppResult<Self> {
        let storage = create_object_storage(&config.storage).await?;
        Ok(Self::new(
            Arc::new(FolderRepository::new(pool.pool().clone())),
            Arc::new(MediaRepository::new(pool.pool().clone())),
            storage,
            &config.folders,
            &config.storage,
        ))
    }

    /// In-memory stores and object storage; nothing outlives the process.
    pub fn ephemeral(config: &AppConfig) -> Self {
        let store = Arc::new(MemoryCatalogStore::new());
        Self::new(
            store.clone(),
            store,
            Some(Arc::new(MemoryObjectStorage::new())),
            &config.folders,
            &config.storage,
        )
    }
}
