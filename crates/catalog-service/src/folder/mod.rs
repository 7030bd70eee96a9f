//! Folder catalog and tree services.

pub mod service;
pub mod tree;

pub use service::{CreateFolderRequest, FolderService, ListFoldersRequest};
pub use tree::TreeService;
