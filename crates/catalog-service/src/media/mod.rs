//! Media catalog: content-addressed uploads, downloads and deletes.

pub mod service;
pub mod upload;

pub use service::{MediaService, UploadMediaRequest};
pub use upload::{DigestedContent, read_and_digest};
