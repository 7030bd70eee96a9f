//! Folder tree expansion and path resolution.

use std::sync::Arc;

use futures::future::BoxFuture;
use uuid::Uuid;

use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_database::FolderStore;
use catalog_entity::folder::{Folder, FolderNode, MAX_FOLDER_DEPTH};

/// Builds folder trees and ancestor paths.
///
/// Both walks are bounded by [`MAX_FOLDER_DEPTH`], which the folder
/// service enforces on creation, so neither needs cycle detection.
#[derive(Debug, Clone)]
pub struct TreeService {
    store: Arc<dyn FolderStore>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(store: Arc<dyn FolderStore>) -> Self {
        Self { store }
    }

    /// The folder with its descendants expanded to the maximum depth.
    pub async fn get_folder_with_children(&self, id: Uuid) -> AppResult<FolderNode> {
        let folder = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        self.expand(folder).await
    }

    fn expand(&self, folder: Folder) -> BoxFuture<'_, AppResult<FolderNode>> {
        Box::pin(async move {
            if folder.depth >= MAX_FOLDER_DEPTH {
                return Ok(FolderNode::leaf(folder));
            }
            let mut children = Vec::new();
            for child in self.store.find_by_parent(Some(folder.id)).await? {
                children.push(self.expand(child).await?);
            }
            Ok(FolderNode { folder, children })
        })
    }

    /// Ancestor chain from the root down to and including `id`.
    pub async fn get_folder_path(&self, id: Uuid) -> AppResult<Vec<Folder>> {
        let mut path = Vec::with_capacity(MAX_FOLDER_DEPTH as usize);
        let mut next = Some(id);

        while let Some(current) = next {
            if path.len() >= MAX_FOLDER_DEPTH as usize {
                return Err(AppError::internal(format!(
                    "Ancestor chain of folder {id} is deeper than {MAX_FOLDER_DEPTH}"
                )));
            }
            let folder = self
                .store
                .find_by_id(current)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Folder {current} not found")))?;
            next = folder.parent_id;
            path.push(folder);
        }

        path.reverse();
        Ok(path)
    }
}
