//! Media asset entity model.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use catalog_core::types::SortDirection;

use super::kind::MediaKind;

/// Metadata for one stored binary object.
///
/// `storage_key` is `media/{kind}/{sha256}` plus the lower-cased extension
/// of the first uploader's filename (see [`storage_key`]). Dedup is keyed by
/// `(kind, sha256)`, so the same bytes and kind map to one asset and one
/// object whatever filename later uploads carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MediaAsset {
    /// Unique asset identifier.
    pub id: Uuid,
    /// Locator of the object in the object store.
    pub storage_key: String,
    /// Kind of content.
    pub kind: MediaKind,
    /// MIME type supplied at upload.
    pub mime_type: String,
    /// Owning folder, if any.
    pub folder_id: Option<Uuid>,
    /// Filename supplied by the first uploader.
    pub original_name: String,
    /// Content size in bytes.
    pub bytes: i64,
    /// Playback duration for audio.
    pub duration_ms: Option<i64>,
    /// Hex-encoded SHA-256 of the content.
    pub sha256: String,
    /// Who uploaded the content.
    pub uploaded_by: Option<Uuid>,
    /// When the asset was recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a new asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMediaAsset {
    pub storage_key: String,
    pub kind: MediaKind,
    pub mime_type: String,
    pub folder_id: Option<Uuid>,
    pub original_name: String,
    pub bytes: i64,
    pub duration_ms: Option<i64>,
    pub sha256: String,
    pub uploaded_by: Option<Uuid>,
}

/// Derive the object key for content of `kind` with digest `sha256`.
///
/// The lower-cased extension of `filename` is appended, if it has one:
/// `media/{kind}/{sha256}{.ext}`.
pub fn storage_key(kind: MediaKind, sha256: &str, filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("media/{}/{}{}", kind.as_str(), sha256, ext)
}

/// Filter applied by media listings. Unset fields do not constrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaFilter {
    pub folder_id: Option<Uuid>,
    pub kind: Option<MediaKind>,
    pub uploaded_by: Option<Uuid>,
    pub sha256: Option<String>,
    /// Case-insensitive substring of the original filename.
    pub original_name: Option<String>,
}

impl MediaFilter {
    /// Whether `asset` satisfies every set criterion.
    pub fn matches(&self, asset: &MediaAsset) -> bool {
        if self.folder_id.is_some() && asset.folder_id != self.folder_id {
            return false;
        }
        if self.kind.is_some_and(|k| k != asset.kind) {
            return false;
        }
        if self.uploaded_by.is_some() && asset.uploaded_by != self.uploaded_by {
            return false;
        }
        if self
            .sha256
            .as_deref()
            .is_some_and(|d| !d.eq_ignore_ascii_case(&asset.sha256))
        {
            return false;
        }
        match self.original_name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => asset
                .original_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

/// Sortable media columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaSortField {
    #[default]
    CreatedAt,
    Bytes,
}

impl MediaSortField {
    /// Column name used in SQL.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Bytes => "bytes",
        }
    }
}

/// Sort specification for media listings. Newest first by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MediaSort {
    pub field: MediaSortField,
    pub direction: SortDirection,
}

impl Default for MediaSort {
    fn default() -> Self {
        Self {
            field: MediaSortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl MediaSort {
    /// Compare two assets according to this sort.
    pub fn compare(&self, a: &MediaAsset, b: &MediaAsset) -> std::cmp::Ordering {
        let ordering = match self.field {
            MediaSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            MediaSortField::Bytes => a.bytes.cmp(&b.bytes),
        };
        self.direction.apply(ordering.then_with(|| a.id.cmp(&b.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "8e14a3f1c8e4d2b6a0f5c7d9e1b3a5c7d9e1f3a5b7c9d1e3f5a7b9c1d3e5f7a9";

    #[test]
    fn test_storage_key_appends_lowercased_extension() {
        assert_eq!(
            storage_key(MediaKind::Image, DIGEST, "Photo.JPG"),
            format!("media/image/{DIGEST}.jpg")
        );
    }

    #[test]
    fn test_storage_key_without_extension() {
        assert_eq!(
            storage_key(MediaKind::Audio, DIGEST, "clip"),
            format!("media/audio/{DIGEST}")
        );
        assert_eq!(
            storage_key(MediaKind::Audio, DIGEST, ""),
            format!("media/audio/{DIGEST}")
        );
    }

    #[test]
    fn test_storage_key_ignores_filename_stem() {
        assert_eq!(
            storage_key(MediaKind::Audio, DIGEST, "a.mp3"),
            storage_key(MediaKind::Audio, DIGEST, "other.mp3")
        );
        assert_ne!(
            storage_key(MediaKind::Audio, DIGEST, "a.mp3"),
            storage_key(MediaKind::Image, DIGEST, "a.mp3")
        );
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let sort = MediaSort::default();
        assert_eq!(sort.field, MediaSortField::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Desc);
    }
}
