//! In-memory catalog store.
//!
//! Implements both [`FolderStore`] and [`MediaStore`] over one shared state
//! and enforces the same constraints as the PostgreSQL schema: foreign keys
//! with `RESTRICT` deletes, uniqueness of `(kind, sha256)` and
//! `storage_key`. Used by tests and by ephemeral CLI runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::PageRequest;
use catalog_entity::folder::{Folder, FolderFilter, FolderSort, MAX_FOLDER_DEPTH, NewFolder};
use catalog_entity::media::{MediaAsset, MediaFilter, MediaKind, MediaSort, NewMediaAsset};

use super::{FolderStore, MediaStore};

#[derive(Debug, Default)]
struct CatalogState {
    folders: HashMap<Uuid, Folder>,
    media: HashMap<Uuid, MediaAsset>,
}

/// Catalog metadata held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: &PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let page_items = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();
    (page_items, total)
}

#[async_trait]
impl FolderStore for MemoryCatalogStore {
    async fn create(&self, data: &NewFolder) -> AppResult<Folder> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Folder name must not be blank"));
        }
        if !(1..=MAX_FOLDER_DEPTH).contains(&data.depth) {
            return Err(AppError::max_depth_exceeded(format!(
                "Folder depth {} is outside the allowed range",
                data.depth
            )));
        }

        let mut state = self.state.write().await;
        if let Some(parent_id) = data.parent_id {
            if !state.folders.contains_key(&parent_id) {
                return Err(AppError::not_found(format!(
                    "Parent folder {parent_id} not found"
                )));
            }
        }

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            parent_id: data.parent_id,
            depth: data.depth,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn find_by_parent(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.parent_id == parent_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| FolderSort::default().compare(a, b));
        Ok(folders)
    }

    async fn list(
        &self,
        filter: &FolderFilter,
        sort: FolderSort,
        page: &PageRequest,
    ) -> AppResult<(Vec<Folder>, u64)> {
        let state = self.state.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        folders.sort_by(|a, b| sort.compare(a, b));
        Ok(paginate(folders, page))
    }

    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.name = name.to_string();
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.folders.values().any(|f| f.parent_id == Some(id)) {
            return Err(AppError::has_children(format!(
                "Folder {id} still has subfolders"
            )));
        }
        if state.media.values().any(|m| m.folder_id == Some(id)) {
            return Err(AppError::has_media(format!(
                "Folder {id} still owns media assets"
            )));
        }
        Ok(state.folders.remove(&id).is_some())
    }

    async fn count_children(&self, id: Uuid) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .values()
            .filter(|f| f.parent_id == Some(id))
            .count() as u64)
    }

    async fn count_media_assets(&self, id: Uuid) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .media
            .values()
            .filter(|m| m.folder_id == Some(id))
            .count() as u64)
    }
}

#[async_trait]
impl MediaStore for MemoryCatalogStore {
    async fn create(&self, data: &NewMediaAsset) -> AppResult<MediaAsset> {
        let mut state = self.state.write().await;
        if let Some(folder_id) = data.folder_id {
            if !state.folders.contains_key(&folder_id) {
                return Err(AppError::not_found(format!("Folder {folder_id} not found")));
            }
        }
        let duplicate = state.media.values().any(|m| {
            (m.kind == data.kind && m.sha256 == data.sha256) || m.storage_key == data.storage_key
        });
        if duplicate {
            return Err(AppError::conflict(format!(
                "Media with digest {} already exists for kind {}",
                data.sha256, data.kind
            )));
        }

        let asset = MediaAsset {
            id: Uuid::new_v4(),
            storage_key: data.storage_key.clone(),
            kind: data.kind,
            mime_type: data.mime_type.clone(),
            folder_id: data.folder_id,
            original_name: data.original_name.clone(),
            bytes: data.bytes,
            duration_ms: data.duration_ms,
            sha256: data.sha256.clone(),
            uploaded_by: data.uploaded_by,
            created_at: Utc::now(),
        };
        state.media.insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MediaAsset>> {
        Ok(self.state.read().await.media.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MediaAsset>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.media.get(id).cloned())
            .collect())
    }

    async fn find_by_digest(
        &self,
        kind: MediaKind,
        sha256: &str,
    ) -> AppResult<Option<MediaAsset>> {
        let state = self.state.read().await;
        Ok(state
            .media
            .values()
            .find(|m| m.kind == kind && m.sha256 == sha256)
            .cloned())
    }

    async fn list(
        &self,
        filter: &MediaFilter,
        sort: MediaSort,
        page: &PageRequest,
    ) -> AppResult<(Vec<MediaAsset>, u64)> {
        let state = self.state.read().await;
        let mut assets: Vec<MediaAsset> = state
            .media
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        assets.sort_by(|a, b| sort.compare(a, b));
        Ok(paginate(assets, page))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.media.remove(&id).is_some())
    }
}
