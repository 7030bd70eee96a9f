//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::PageRequest;
use catalog_entity::folder::{Folder, FolderFilter, FolderSort, NewFolder};

use super::FolderStore;

const FOLDER_COLUMNS: &str = "id, name, parent_id, depth, created_at, updated_at";

// `strpos` keeps the search literal: `%` and `_` in user input match themselves.
const FOLDER_FILTER: &str = "($1::uuid IS NULL OR parent_id = $1) \
     AND ($2::int IS NULL OR depth = $2) \
     AND ($3::text IS NULL OR strpos(lower(name), lower($3)) > 0)";

/// PostgreSQL-backed folder store.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn search_term(filter: &FolderFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn create(&self, data: &NewFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(&format!(
            "INSERT INTO folders (name, parent_id, depth) VALUES ($1, $2, $3) \
             RETURNING {FOLDER_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(data.depth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found(format!(
                    "Parent folder {} not found",
                    data.parent_id.map(|p| p.to_string()).unwrap_or_default()
                ))
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folders_name_check") =>
            {
                AppError::validation("Folder name must not be blank")
            }
            sqlx::Error::Database(ref db_err) if db_err.is_check_violation() => {
                AppError::max_depth_exceeded(format!(
                    "Folder depth {} is outside the allowed range",
                    data.depth
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_by_parent(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders \
             WHERE parent_id IS NOT DISTINCT FROM $1 ORDER BY name ASC, id ASC"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn list(
        &self,
        filter: &FolderFilter,
        sort: FolderSort,
        page: &PageRequest,
    ) -> AppResult<(Vec<Folder>, u64)> {
        let search = search_term(filter);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM folders WHERE {FOLDER_FILTER}"
        ))
        .bind(filter.parent_id)
        .bind(filter.depth)
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))?;

        let direction = sort.direction.as_sql();
        let folders = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE {FOLDER_FILTER} \
             ORDER BY {} {direction}, id {direction} LIMIT $4 OFFSET $5",
            sort.field.column()
        ))
        .bind(filter.parent_id)
        .bind(filter.depth)
        .bind(search.as_deref())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))?;

        Ok((folders, total as u64))
    }

    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(&format!(
            "UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {FOLDER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    if db_err.constraint() == Some("media_assets_folder_id_fkey") {
                        AppError::has_media(format!("Folder {id} still owns media assets"))
                    } else {
                        AppError::has_children(format!("Folder {id} still has subfolders"))
                    }
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to delete folder", e),
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_children(&self, id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count children", e)
            })?;
        Ok(count as u64)
    }

    async fn count_media_assets(&self, id: Uuid) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM media_assets WHERE folder_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count media assets", e)
                })?;
        Ok(count as u64)
    }
}
