//! Single-pass read of upload content with SHA-256 digesting.

use bytes::{Bytes, BytesMut};
use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;

const READ_CHUNK: usize = 64 * 1024;

/// Upload content buffered in memory together with its digest.
#[derive(Debug, Clone)]
pub struct DigestedContent {
    /// The full content.
    pub body: Bytes,
    /// Lowercase hex SHA-256 of `body`.
    pub sha256: String,
}

impl DigestedContent {
    /// Content length in bytes.
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Read `reader` to the end, hashing while buffering.
///
/// Fails with `EmptyContent` for zero bytes and with `PayloadTooLarge` as
/// soon as more than `max_bytes` have been read.
pub async fn read_and_digest<R>(mut reader: R, max_bytes: u64) -> AppResult<DigestedContent>
where
    R: AsyncRead + Unpin + Send,
{
    let mut hasher = Sha256::new();
    let mut body = BytesMut::new();
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to read upload content", e)
        })?;
        if n == 0 {
            break;
        }
        if body.len() as u64 + n as u64 > max_bytes {
            return Err(AppError::payload_too_large(format!(
                "Upload exceeds maximum size of {max_bytes} bytes"
            )));
        }
        hasher.update(&chunk[..n]);
        body.extend_from_slice(&chunk[..n]);
    }

    if body.is_empty() {
        return Err(AppError::empty_content("Uploaded content is empty"));
    }

    Ok(DigestedContent {
        body: body.freeze(),
        sha256: format!("{:x}", hasher.finalize()),
    })
}
