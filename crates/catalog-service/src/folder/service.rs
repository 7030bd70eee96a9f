//! Folder CRUD with depth and delete guards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use catalog_core::config::FolderConfig;
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::{PageRequest, PageResponse};
use catalog_database::FolderStore;
use catalog_entity::folder::{
    Folder, FolderFilter, FolderSort, FolderSummary, MAX_FOLDER_DEPTH, NewFolder,
};

/// Manages the depth-bounded folder tree.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder store.
    store: Arc<dyn FolderStore>,
    /// Listing bounds.
    config: FolderConfig,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for a root folder).
    pub parent_id: Option<Uuid>,
    /// Depth suggested by the caller. Never trusted: depth is always
    /// derived from the parent.
    #[serde(default)]
    pub depth: Option<i32>,
}

/// Request for a filtered, sorted page of folders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFoldersRequest {
    /// Filter criteria.
    #[serde(default)]
    pub filter: FolderFilter,
    /// Sort order (name ascending by default).
    #[serde(default)]
    pub sort: FolderSort,
    /// Requested page (1-based; values below 1 become 1).
    #[serde(default)]
    pub page: u64,
    /// Requested page size (0 selects the configured default).
    #[serde(default)]
    pub page_size: u64,
}

fn normalize_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn FolderStore>, config: FolderConfig) -> Self {
        Self { store, config }
    }

    /// Depth a new folder under `parent_id` would get.
    ///
    /// Roots are depth 1. An unknown parent is `NotFound`; a parent already
    /// at the maximum depth is `MaxDepthExceeded`.
    pub async fn validate_depth(&self, parent_id: Option<Uuid>) -> AppResult<i32> {
        let Some(parent_id) = parent_id else {
            return Ok(1);
        };
        let parent = self.get_folder(parent_id).await?;
        let depth = parent.depth + 1;
        if depth > MAX_FOLDER_DEPTH {
            return Err(AppError::max_depth_exceeded(format!(
                "Cannot create a folder under '{}': maximum depth is {MAX_FOLDER_DEPTH}",
                parent.name
            )));
        }
        Ok(depth)
    }

    /// Creates a new folder.
    pub async fn create_folder(&self, req: CreateFolderRequest) -> AppResult<Folder> {
        let name = normalize_name(&req.name)?;
        let depth = self.validate_depth(req.parent_id).await?;

        if let Some(requested) = req.depth.filter(|d| *d != depth) {
            warn!(requested, depth, "Ignoring caller-supplied folder depth");
        }

        let folder = self
            .store
            .create(&NewFolder {
                name,
                parent_id: req.parent_id,
                depth,
            })
            .await?;

        info!(
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            depth = folder.depth,
            "Folder created"
        );

        Ok(folder)
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, id: Uuid) -> AppResult<Folder> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Gets a folder with its child and media counts.
    pub async fn get_folder_summary(&self, id: Uuid) -> AppResult<FolderSummary> {
        let folder = self.get_folder(id).await?;
        let child_count = self.store.count_children(id).await?;
        let media_count = self.store.count_media_assets(id).await?;
        Ok(FolderSummary {
            folder,
            child_count,
            media_count,
        })
    }

    /// Lists folders without a parent, ordered by name.
    pub async fn get_root_folders(&self) -> AppResult<Vec<Folder>> {
        self.store.find_by_parent(None).await
    }

    /// Lists the direct children of a folder, ordered by name.
    pub async fn get_subfolders(&self, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        self.store.find_by_parent(Some(parent_id)).await
    }

    /// Lists a page of folders matching the request's filter.
    pub async fn list_folders(&self, req: ListFoldersRequest) -> AppResult<PageResponse<Folder>> {
        let page = PageRequest::bounded(
            req.page,
            req.page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        );
        let (items, total) = self.store.list(&req.filter, req.sort, &page).await?;
        Ok(PageResponse::new(items, &page, total))
    }

    /// Renames a folder. Parent and depth are never changed.
    pub async fn update_folder(&self, id: Uuid, name: &str) -> AppResult<Folder> {
        let name = normalize_name(name)?;
        let folder = self.store.rename(id, &name).await?;
        info!(folder_id = %id, name = %folder.name, "Folder renamed");
        Ok(folder)
    }

    /// Deletes an empty folder.
    ///
    /// Fails with `HasChildren` while subfolders exist and with `HasMedia`
    /// while it owns media assets.
    pub async fn delete_folder(&self, id: Uuid) -> AppResult<()> {
        let folder = self.get_folder(id).await?;

        let children = self.store.count_children(id).await?;
        if children > 0 {
            return Err(AppError::has_children(format!(
                "Folder '{}' still has {children} subfolder(s)",
                folder.name
            )));
        }

        let media = self.store.count_media_assets(id).await?;
        if media > 0 {
            return Err(AppError::has_media(format!(
                "Folder '{}' still owns {media} media asset(s)",
                folder.name
            )));
        }

        if !self.store.delete(id).await? {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }

        info!(folder_id = %id, name = %folder.name, "Folder deleted");
        Ok(())
    }

    /// Number of direct child folders.
    pub async fn count_children(&self, id: Uuid) -> AppResult<u64> {
        self.store.count_children(id).await
    }

    /// Number of media assets owned by the folder.
    pub async fn count_media_assets(&self, id: Uuid) -> AppResult<u64> {
        self.store.count_media_assets(id).await
    }
}
