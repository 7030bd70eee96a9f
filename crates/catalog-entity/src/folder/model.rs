//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use catalog_core::types::SortDirection;

/// Deepest level a folder may sit at. Roots are depth 1.
pub const MAX_FOLDER_DEPTH: i32 = 3;

/// A folder in the catalog hierarchy.
///
/// A root folder has depth 1; any other folder sits exactly one level
/// below its parent, so the tree is acyclic and never deeper than
/// [`MAX_FOLDER_DEPTH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name (never blank).
    pub name: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<Uuid>,
    /// Depth in the folder tree (1 for root).
    pub depth: i32,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this folder may still receive subfolders.
    pub fn can_have_children(&self) -> bool {
        self.depth < MAX_FOLDER_DEPTH
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
    /// Depth in the tree, already validated against the parent.
    pub depth: i32,
}

/// Filter applied by folder listings. Unset fields do not constrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderFilter {
    /// Only direct children of this folder.
    pub parent_id: Option<Uuid>,
    /// Only folders at this depth.
    pub depth: Option<i32>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
}

impl FolderFilter {
    /// Whether `folder` satisfies every set criterion.
    pub fn matches(&self, folder: &Folder) -> bool {
        if let Some(parent_id) = self.parent_id {
            if folder.parent_id != Some(parent_id) {
                return false;
            }
        }
        if let Some(depth) = self.depth {
            if folder.depth != depth {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => folder
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

/// Sortable folder columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FolderSortField {
    /// Sort by name.
    #[default]
    Name,
    /// Sort by creation time.
    CreatedAt,
}

impl FolderSortField {
    /// Column name used in SQL.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Sort specification for folder listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FolderSort {
    /// Column to sort by.
    #[serde(default)]
    pub field: FolderSortField,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl FolderSort {
    /// Compare two folders according to this sort.
    pub fn compare(&self, a: &Folder, b: &Folder) -> std::cmp::Ordering {
        let ordering = match self.field {
            FolderSortField::Name => a.name.cmp(&b.name),
            FolderSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        self.direction.apply(ordering.then_with(|| a.id.cmp(&b.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(name: &str, parent_id: Option<Uuid>, depth: i32) -> Folder {
        let now = Utc::now();
        Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
            depth,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let filter = FolderFilter {
            search: Some("aud".into()),
            ..Default::default()
        };
        assert!(filter.matches(&folder("Audio", None, 1)));
        assert!(!filter.matches(&folder("Images", None, 1)));
    }

    #[test]
    fn test_filter_by_parent_and_depth() {
        let parent = folder("Media", None, 1);
        let child = folder("Audio", Some(parent.id), 2);
        let filter = FolderFilter {
            parent_id: Some(parent.id),
            depth: Some(2),
            search: None,
        };
        assert!(filter.matches(&child));
        assert!(!filter.matches(&parent));
    }

    #[test]
    fn test_depth_three_is_a_leaf() {
        assert!(folder("a", None, 2).can_have_children());
        assert!(!folder("a", None, MAX_FOLDER_DEPTH).can_have_children());
    }
}
