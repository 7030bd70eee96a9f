//! Object storage adapters.

pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use memory::MemoryObjectStorage;
#[cfg(feature = "s3")]
pub use s3::S3ObjectStorage;
