//! # catalog-storage
//!
//! Object storage adapters for media content. The S3-compatible adapter is
//! built with the `s3` feature; the in-memory adapter is always available.

pub mod factory;
pub mod providers;

pub use factory::create_object_storage;
pub use providers::MemoryObjectStorage;
#[cfg(feature = "s3")]
pub use providers::S3ObjectStorage;
