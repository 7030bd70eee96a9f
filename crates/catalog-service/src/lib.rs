//! # catalog-service
//!
//! Business logic for the content catalog. The folder catalog enforces the
//! depth-bounded tree and guards deletes; the media catalog deduplicates
//! uploads by content digest and keeps object storage and metadata in step.
//!
//! Services follow constructor injection: stores and the object storage
//! adapter are handed in as `Arc` trait objects.

pub mod context;
pub mod folder;
pub mod media;

pub use context::CatalogContext;
pub use folder::{CreateFolderRequest, FolderService, ListFoldersRequest, TreeService};
pub use media::{MediaService, UploadMediaRequest};
