//! # catalog-database
//!
//! PostgreSQL connection management, schema migrations and the metadata
//! stores backing the folder and media catalogs.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{FolderStore, MediaStore};
