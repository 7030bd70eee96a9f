//! Metadata stores for folders and media assets.
//!
//! The services depend on the [`FolderStore`] and [`MediaStore`] traits;
//! [`FolderRepository`] and [`MediaRepository`] implement them over
//! PostgreSQL and [`MemoryCatalogStore`] implements both in memory.

pub mod folder;
pub mod media;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use catalog_core::result::AppResult;
use catalog_core::types::PageRequest;
use catalog_entity::folder::{Folder, FolderFilter, FolderSort, NewFolder};
use catalog_entity::media::{MediaAsset, MediaFilter, MediaKind, MediaSort, NewMediaAsset};

pub use folder::FolderRepository;
pub use media::MediaRepository;
pub use memory::MemoryCatalogStore;

/// Persistence of the folder tree.
///
/// Stores trust the depth already computed by the caller; they only
/// enforce referential integrity (a missing parent is `NotFound`, removing
/// a folder that still has dependents is refused).
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a folder.
    async fn create(&self, data: &NewFolder) -> AppResult<Folder>;

    /// Find a folder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Direct children of `parent_id` ordered by name; roots when `None`.
    async fn find_by_parent(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Folder>>;

    /// One page of folders matching `filter`, plus the total match count.
    async fn list(
        &self,
        filter: &FolderFilter,
        sort: FolderSort,
        page: &PageRequest,
    ) -> AppResult<(Vec<Folder>, u64)>;

    /// Set a folder's name and bump `updated_at`.
    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Folder>;

    /// Remove a folder. Returns `false` when no row matched.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Number of direct child folders.
    async fn count_children(&self, id: Uuid) -> AppResult<u64>;

    /// Number of media assets owned by the folder.
    async fn count_media_assets(&self, id: Uuid) -> AppResult<u64>;
}

/// Persistence of media asset metadata.
///
/// `(kind, sha256)` and `storage_key` are unique; `create` reports a
/// violation as `Conflict`.
#[async_trait]
pub trait MediaStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert an asset.
    async fn create(&self, data: &NewMediaAsset) -> AppResult<MediaAsset>;

    /// Find an asset by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MediaAsset>>;

    /// Assets for the given IDs in request order; unknown IDs are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MediaAsset>>;

    /// The asset holding content with this kind and digest.
    async fn find_by_digest(&self, kind: MediaKind, sha256: &str)
    -> AppResult<Option<MediaAsset>>;

    /// One page of assets matching `filter`, plus the total match count.
    async fn list(
        &self,
        filter: &MediaFilter,
        sort: MediaSort,
        page: &PageRequest,
    ) -> AppResult<(Vec<MediaAsset>, u64)>;

    /// Remove an asset. Returns `false` when no row matched.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
