//! Shared test helpers for catalog service tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use catalog_core::config::{FolderConfig, StorageConfig};
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStorage;
use catalog_core::types::PageRequest;
use catalog_database::repositories::MemoryCatalogStore;
use catalog_database::{FolderStore, MediaStore};
use catalog_entity::folder::Folder;
use catalog_entity::media::{
    MediaAsset, MediaFilter, MediaKind, MediaSort, NewMediaAsset, storage_key,
};
use catalog_service::{CatalogContext, CreateFolderRequest, UploadMediaRequest};
use catalog_storage::MemoryObjectStorage;

/// Upload limit used by the test stack.
pub const MAX_UPLOAD: u64 = 1024;

/// Object storage that records calls and fails on demand.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    pub inner: MemoryObjectStorage,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_presign: AtomicBool,
    pub delete_calls: AtomicU64,
    pub last_ttl: Mutex<Option<Duration>>,
}

impl FlakyStorage {
    pub fn put_count(&self) -> u64 {
        self.inner.put_count()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }
}

#[async_trait]
impl ObjectStorage for FlakyStorage {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        size: u64,
        content_type: &str,
    ) -> AppResult<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable("put refused"));
        }
        self.inner.put_object(key, body, size, content_type).await
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable("delete refused"));
        }
        self.inner.delete_object(key).await
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        if self.fail_presign.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable("presign refused"));
        }
        *self.last_ttl.lock().unwrap() = Some(ttl);
        self.inner.presigned_url(key, ttl).await
    }
}

/// Media store over the shared in-memory catalog that can fail inserts,
/// fail deletes, or lose an insert race to a simulated concurrent upload.
#[derive(Debug)]
pub struct FlakyMediaStore {
    pub inner: MemoryCatalogStore,
    pub fail_create: AtomicBool,
    /// The concurrent upload carries the same record.
    pub lose_race: AtomicBool,
    /// The concurrent upload used this filename, so its key may differ.
    pub lose_race_to: Mutex<Option<String>>,
    /// Report a conflict, but no winning row can be found afterwards.
    pub phantom_conflict: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl FlakyMediaStore {
    fn new(inner: MemoryCatalogStore) -> Self {
        Self {
            inner,
            fail_create: AtomicBool::new(false),
            lose_race: AtomicBool::new(false),
            lose_race_to: Mutex::new(None),
            phantom_conflict: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MediaStore for FlakyMediaStore {
    async fn create(&self, data: &NewMediaAsset) -> AppResult<MediaAsset> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::database("insert refused"));
        }
        if self.phantom_conflict.swap(false, Ordering::SeqCst) {
            return Err(AppError::conflict("duplicate digest"));
        }
        let winner_name = self.lose_race_to.lock().unwrap().take();
        if let Some(filename) = winner_name {
            let winner = NewMediaAsset {
                storage_key: storage_key(data.kind, &data.sha256, &filename),
                original_name: filename,
                ..data.clone()
            };
            MediaStore::create(&self.inner, &winner).await?;
            return Err(AppError::conflict("duplicate digest"));
        }
        if self.lose_race.swap(false, Ordering::SeqCst) {
            MediaStore::create(&self.inner, data).await?;
            return Err(AppError::conflict("duplicate digest"));
        }
        MediaStore::create(&self.inner, data).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MediaAsset>> {
        MediaStore::find_by_id(&self.inner, id).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MediaAsset>> {
        self.inner.find_by_ids(ids).await
    }

    async fn find_by_digest(
        &self,
        kind: MediaKind,
        sha256: &str,
    ) -> AppResult<Option<MediaAsset>> {
        self.inner.find_by_digest(kind, sha256).await
    }

    async fn list(
        &self,
        filter: &MediaFilter,
        sort: MediaSort,
        page: &PageRequest,
    ) -> AppResult<(Vec<MediaAsset>, u64)> {
        MediaStore::list(&self.inner, filter, sort, page).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::database("delete refused"));
        }
        MediaStore::delete(&self.inner, id).await
    }
}

/// Service stack over in-memory stores with handles on the doubles.
pub struct TestCatalog {
    pub ctx: CatalogContext,
    pub store: MemoryCatalogStore,
    pub media_store: Arc<FlakyMediaStore>,
    pub storage: Arc<FlakyStorage>,
}

impl TestCatalog {
    /// Stack with an object store.
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Stack with no object store configured.
    pub fn without_storage() -> Self {
        Self::build(false)
    }

    fn build(with_storage: bool) -> Self {
        let store = MemoryCatalogStore::new();
        let media_store = Arc::new(FlakyMediaStore::new(store.clone()));
        let storage = Arc::new(FlakyStorage::default());
        let storage_config = StorageConfig {
            max_upload_size_bytes: MAX_UPLOAD,
            ..Default::default()
        };

        let object_storage: Option<Arc<dyn ObjectStorage>> = if with_storage {
            Some(storage.clone())
        } else {
            None
        };

        let ctx = CatalogContext::new(
            Arc::new(store.clone()),
            media_store.clone(),
            object_storage,
            &FolderConfig::default(),
            &storage_config,
        );

        Self {
            ctx,
            store,
            media_store,
            storage,
        }
    }

    /// Create a folder, panicking on failure.
    pub async fn folder(&self, name: &str, parent_id: Option<Uuid>) -> Folder {
        self.ctx
            .folders
            .create_folder(CreateFolderRequest {
                name: name.to_string(),
                parent_id,
                depth: None,
            })
            .await
            .expect("folder creation failed")
    }

    /// Build a root → child → grandchild chain.
    pub async fn chain(&self) -> (Folder, Folder, Folder) {
        let root = self.folder("Media", None).await;
        let child = self.folder("Audio", Some(root.id)).await;
        let leaf = self.folder("Lesson1", Some(child.id)).await;
        (root, child, leaf)
    }

    /// Upload content, returning the service result.
    pub async fn upload(
        &self,
        kind: &str,
        content: &[u8],
        filename: &str,
        folder_id: Option<Uuid>,
    ) -> AppResult<MediaAsset> {
        self.ctx.media.upload_media(request(kind, content, filename, folder_id)).await
    }

    /// Record media metadata directly, bypassing object storage.
    pub async fn seed_media(&self, kind: MediaKind, sha256: &str) -> MediaAsset {
        MediaStore::create(
            &self.store,
            &NewMediaAsset {
                storage_key: format!("media/{kind}/{sha256}"),
                kind,
                mime_type: "application/octet-stream".into(),
                folder_id: None,
                original_name: "seed".into(),
                bytes: 1,
                duration_ms: None,
                sha256: sha256.to_string(),
                uploaded_by: None,
            },
        )
        .await
        .expect("seeding media failed")
    }

    /// Number of folders currently stored.
    pub async fn folder_count(&self) -> u64 {
        let (_, total) = FolderStore::list(
            &self.store,
            &Default::default(),
            Default::default(),
            &PageRequest::default(),
        )
        .await
        .unwrap();
        total
    }
}

/// Build an upload request over an in-memory buffer.
pub fn request(
    kind: &str,
    content: &[u8],
    filename: &str,
    folder_id: Option<Uuid>,
) -> UploadMediaRequest<Cursor<Vec<u8>>> {
    UploadMediaRequest {
        content: Cursor::new(content.to_vec()),
        filename: filename.to_string(),
        mime_type: if kind == "audio" {
            "audio/mpeg".into()
        } else {
            "image/png".into()
        },
        kind: kind.to_string(),
        uploaded_by: None,
        folder_id,
        duration_ms: None,
    }
}

/// Lowercase hex SHA-256 of `content`.
pub fn digest(content: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(content))
}
