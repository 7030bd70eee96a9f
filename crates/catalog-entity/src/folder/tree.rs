//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use super::model::Folder;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder at this node.
    #[serde(flatten)]
    pub folder: Folder,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Create a node without children.
    pub fn leaf(folder: Folder) -> Self {
        Self {
            folder,
            children: Vec::new(),
        }
    }

    /// Number of folders in this subtree, including this node.
    pub fn total_folders(&self) -> u64 {
        1 + self
            .children
            .iter()
            .map(FolderNode::total_folders)
            .sum::<u64>()
    }
}

/// A folder together with its read-side aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSummary {
    /// The folder itself.
    #[serde(flatten)]
    pub folder: Folder,
    /// Number of direct child folders.
    pub child_count: u64,
    /// Number of media assets owned by the folder.
    pub media_count: u64,
}
