//! Media asset repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::PageRequest;
use catalog_entity::media::{MediaAsset, MediaFilter, MediaKind, MediaSort, NewMediaAsset};

use super::MediaStore;

const MEDIA_COLUMNS: &str = "id, storage_key, kind, mime_type, folder_id, original_name, \
     bytes, duration_ms, sha256, uploaded_by, created_at";

const MEDIA_FILTER: &str = "($1::uuid IS NULL OR folder_id = $1) \
     AND ($2::media_kind IS NULL OR kind = $2) \
     AND ($3::uuid IS NULL OR uploaded_by = $3) \
     AND ($4::text IS NULL OR sha256 = lower($4)) \
     AND ($5::text IS NULL OR strpos(lower(original_name), lower($5)) > 0)";

/// PostgreSQL-backed media asset store.
#[derive(Debug, Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Create a new media repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[async_trait]
impl MediaStore for MediaRepository {
    async fn create(&self, data: &NewMediaAsset) -> AppResult<MediaAsset> {
        sqlx::query_as::<_, MediaAsset>(&format!(
            "INSERT INTO media_assets \
             (storage_key, kind, mime_type, folder_id, original_name, bytes, duration_ms, \
              sha256, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {MEDIA_COLUMNS}"
        ))
        .bind(&data.storage_key)
        .bind(data.kind)
        .bind(&data.mime_type)
        .bind(data.folder_id)
        .bind(&data.original_name)
        .bind(data.bytes)
        .bind(data.duration_ms)
        .bind(&data.sha256)
        .bind(data.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!(
                    "Media with digest {} already exists for kind {}",
                    data.sha256, data.kind
                ))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found(format!(
                    "Folder {} not found",
                    data.folder_id.map(|f| f.to_string()).unwrap_or_default()
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create media asset", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MediaAsset>> {
        sqlx::query_as::<_, MediaAsset>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_assets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find media asset", e))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<MediaAsset>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, MediaAsset>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_assets WHERE id = ANY($1) \
             ORDER BY array_position($1, id)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch media assets", e)
        })
    }

    async fn find_by_digest(
        &self,
        kind: MediaKind,
        sha256: &str,
    ) -> AppResult<Option<MediaAsset>> {
        sqlx::query_as::<_, MediaAsset>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_assets WHERE kind = $1 AND sha256 = $2"
        ))
        .bind(kind)
        .bind(sha256)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find media by digest", e)
        })
    }

    async fn list(
        &self,
        filter: &MediaFilter,
        sort: MediaSort,
        page: &PageRequest,
    ) -> AppResult<(Vec<MediaAsset>, u64)> {
        let sha256 = non_blank(filter.sha256.as_deref());
        let name = non_blank(filter.original_name.as_deref());

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM media_assets WHERE {MEDIA_FILTER}"
        ))
        .bind(filter.folder_id)
        .bind(filter.kind)
        .bind(filter.uploaded_by)
        .bind(sha256)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count media assets", e)
        })?;

        let direction = sort.direction.as_sql();
        let assets = sqlx::query_as::<_, MediaAsset>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_assets WHERE {MEDIA_FILTER} \
             ORDER BY {} {direction}, id {direction} LIMIT $6 OFFSET $7",
            sort.field.column()
        ))
        .bind(filter.folder_id)
        .bind(filter.kind)
        .bind(filter.uploaded_by)
        .bind(sha256)
        .bind(name)
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list media assets", e)
        })?;

        Ok((assets, total as u64))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM media_assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete media asset", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
