//! Media catalog: content-addressed uploads with compensating rollback.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncRead;
use tracing::{error, info, warn};
use uuid::Uuid;

use catalog_core::config::StorageConfig;
use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStorage;
use catalog_core::types::{PageRequest, PageResponse};
use catalog_database::{FolderStore, MediaStore};
use catalog_entity::media::{
    MediaAsset, MediaFilter, MediaKind, MediaSort, NewMediaAsset, storage_key,
};

use super::upload::read_and_digest;

/// Upload parameters accompanying a content stream.
#[derive(Debug)]
pub struct UploadMediaRequest<R> {
    /// The content to store.
    pub content: R,
    /// Filename supplied by the uploader; its extension ends up in the key.
    pub filename: String,
    /// MIME type recorded with the object.
    pub mime_type: String,
    /// Requested kind, parsed case-insensitively.
    pub kind: String,
    /// Uploader identity.
    pub uploaded_by: Option<Uuid>,
    /// Owning folder.
    pub folder_id: Option<Uuid>,
    /// Playback duration for audio.
    pub duration_ms: Option<i64>,
}

/// Stores media content once per distinct `(kind, digest)`.
#[derive(Debug, Clone)]
pub struct MediaService {
    media: Arc<dyn MediaStore>,
    folders: Arc<dyn FolderStore>,
    storage: Option<Arc<dyn ObjectStorage>>,
    presign_ttl: Duration,
    max_upload_bytes: u64,
}

impl MediaService {
    /// Creates a new media service. `storage` is `None` when no object
    /// store is configured.
    pub fn new(
        media: Arc<dyn MediaStore>,
        folders: Arc<dyn FolderStore>,
        storage: Option<Arc<dyn ObjectStorage>>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            media,
            folders,
            storage,
            presign_ttl: config.presign_ttl(),
            max_upload_bytes: config.max_upload_size_bytes,
        }
    }

    fn storage(&self) -> AppResult<&Arc<dyn ObjectStorage>> {
        self.storage
            .as_ref()
            .ok_or_else(|| AppError::storage_unavailable("Object storage is not configured"))
    }

    /// Uploads content, returning the existing asset when identical content
    /// of the same kind is already catalogued.
    pub async fn upload_media<R>(&self, req: UploadMediaRequest<R>) -> AppResult<MediaAsset>
    where
        R: AsyncRead + Unpin + Send,
    {
        let kind: MediaKind = req.kind.parse()?;
        let content = read_and_digest(req.content, self.max_upload_bytes).await?;

        if let Some(folder_id) = req.folder_id {
            if self.folders.find_by_id(folder_id).await?.is_none() {
                return Err(AppError::not_found(format!("Folder {folder_id} not found")));
            }
        }

        if let Some(existing) = self.media.find_by_digest(kind, &content.sha256).await? {
            info!(
                media_id = %existing.id,
                sha256 = %existing.sha256,
                kind = %kind,
                "Upload deduplicated to existing asset"
            );
            return Ok(existing);
        }

        let storage = self.storage()?;
        let key = storage_key(kind, &content.sha256, &req.filename);
        storage
            .put_object(&key, content.body.clone(), content.size(), &req.mime_type)
            .await?;

        let record = NewMediaAsset {
            storage_key: key.clone(),
            kind,
            mime_type: req.mime_type,
            folder_id: req.folder_id,
            original_name: req.filename,
            bytes: content.size() as i64,
            duration_ms: req.duration_ms,
            sha256: content.sha256.clone(),
            uploaded_by: req.uploaded_by,
        };

        match self.media.create(&record).await {
            Ok(asset) => {
                info!(
                    media_id = %asset.id,
                    storage_key = %asset.storage_key,
                    sha256 = %asset.sha256,
                    bytes = asset.bytes,
                    "Media uploaded"
                );
                Ok(asset)
            }
            Err(e) if e.is(ErrorKind::Conflict) => {
                self.converge_on_conflict(storage, kind, &content.sha256, &key, e)
                    .await
            }
            Err(e) => Err(self.compensate(storage, &key, e).await),
        }
    }

    /// A concurrent upload inserted the same content first; return its row.
    async fn converge_on_conflict(
        &self,
        storage: &Arc<dyn ObjectStorage>,
        kind: MediaKind,
        sha256: &str,
        key: &str,
        conflict: AppError,
    ) -> AppResult<MediaAsset> {
        let Some(winner) = self.media.find_by_digest(kind, sha256).await? else {
            return Err(self.compensate(storage, key, conflict).await);
        };
        warn!(
            media_id = %winner.id,
            sha256,
            "Concurrent upload of identical content; returning existing asset"
        );
        // Same bytes under a different extension: our object has no row.
        if winner.storage_key != key {
            if let Err(e) = storage.delete_object(key).await {
                error!(storage_key = key, error = %e, "Failed to remove unreferenced object");
            }
        }
        Ok(winner)
    }

    /// Best-effort removal of an object whose metadata insert failed.
    async fn compensate(
        &self,
        storage: &Arc<dyn ObjectStorage>,
        key: &str,
        cause: AppError,
    ) -> AppError {
        warn!(storage_key = key, error = %cause, "Metadata insert failed; removing stored object");
        match storage.delete_object(key).await {
            Ok(()) => cause,
            Err(rollback) => {
                error!(
                    storage_key = key,
                    error = %rollback,
                    "Compensating delete failed; object is orphaned"
                );
                cause.with_rollback_failure(rollback)
            }
        }
    }

    /// Uploads each item in order; one failure does not stop the rest.
    pub async fn upload_media_batch<R>(
        &self,
        items: Vec<UploadMediaRequest<R>>,
    ) -> Vec<AppResult<MediaAsset>>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(self.upload_media(item).await);
        }
        results
    }

    /// Gets an asset by ID.
    pub async fn get_media_by_id(&self, id: Uuid) -> AppResult<MediaAsset> {
        self.media
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Media {id} not found")))
    }

    /// Gets the assets that exist among `ids`, in request order.
    pub async fn get_media_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MediaAsset>> {
        self.media.find_by_ids(ids).await
    }

    /// Lists a page of assets matching `filter`.
    pub async fn list_media(
        &self,
        filter: &MediaFilter,
        sort: MediaSort,
        page: PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>> {
        let (items, total) = self.media.list(filter, sort, &page).await?;
        Ok(PageResponse::new(items, &page, total))
    }

    /// Time-limited download URL. A missing or zero `ttl` uses the
    /// configured default.
    pub async fn get_presigned_url(&self, id: Uuid, ttl: Option<Duration>) -> AppResult<String> {
        let asset = self.get_media_by_id(id).await?;
        let ttl = ttl.filter(|t| !t.is_zero()).unwrap_or(self.presign_ttl);
        self.storage()?
            .presigned_url(&asset.storage_key, ttl)
            .await
    }

    /// Deletes the stored object, then the metadata row.
    ///
    /// A failed object delete leaves the row untouched. A failed row delete
    /// after the object is gone is logged with the storage key.
    pub async fn delete_media(&self, id: Uuid) -> AppResult<()> {
        let asset = self.get_media_by_id(id).await?;
        let storage = self.storage()?;

        storage.delete_object(&asset.storage_key).await?;

        match self.media.delete(id).await {
            Ok(true) => {
                info!(media_id = %id, storage_key = %asset.storage_key, "Media deleted");
                Ok(())
            }
            Ok(false) => Err(AppError::not_found(format!("Media {id} not found"))),
            Err(e) => {
                error!(
                    media_id = %id,
                    storage_key = %asset.storage_key,
                    error = %e,
                    "Object deleted but metadata delete failed; row is dangling"
                );
                Err(e)
            }
        }
    }
}
