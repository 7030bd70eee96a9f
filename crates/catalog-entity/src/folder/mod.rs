//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{Folder, FolderFilter, FolderSort, FolderSortField, MAX_FOLDER_DEPTH, NewFolder};
pub use tree::{FolderNode, FolderSummary};
