//! Media management CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use catalog_core::error::AppError;
use catalog_core::types::PageRequest;
use catalog_entity::media::{MediaAsset, MediaFilter, MediaKind, MediaSort, MediaSortField};
use catalog_service::{CatalogContext, UploadMediaRequest};

use super::{DirectionArg, parse_id, parse_opt_id};
use crate::output::{self, OutputFormat};

/// Arguments for media commands
#[derive(Debug, Args)]
pub struct MediaArgs {
    /// Media subcommand
    #[command(subcommand)]
    pub command: MediaCommand,
}

/// Metadata shared by single and batch uploads
#[derive(Debug, Args)]
pub struct UploadOptions {
    /// Media kind (image or audio)
    #[arg(short, long)]
    pub kind: String,
    /// MIME type; guessed from the file extension when omitted
    #[arg(short, long)]
    pub mime_type: Option<String>,
    /// Owning folder ID
    #[arg(long)]
    pub folder_id: Option<String>,
    /// Uploader ID
    #[arg(long)]
    pub uploaded_by: Option<String>,
    /// Playback duration in milliseconds
    #[arg(long)]
    pub duration_ms: Option<i64>,
}

/// Media subcommands
#[derive(Debug, Subcommand)]
pub enum MediaCommand {
    /// Upload a file
    Upload {
        /// File to upload
        path: PathBuf,
        #[command(flatten)]
        options: UploadOptions,
    },
    /// Upload several files with the same metadata
    UploadBatch {
        /// Files to upload, in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[command(flatten)]
        options: UploadOptions,
    },
    /// Show one or more assets
    Get {
        /// Media IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List assets with filters and paging
    List {
        /// Only assets in this folder
        #[arg(long)]
        folder_id: Option<String>,
        /// Only assets of this kind
        #[arg(short, long)]
        kind: Option<String>,
        /// Only assets from this uploader
        #[arg(long)]
        uploaded_by: Option<String>,
        /// Only assets with this SHA-256 digest
        #[arg(long)]
        sha256: Option<String>,
        /// Case-insensitive filename substring
        #[arg(short, long)]
        name: Option<String>,
        /// Sort field
        #[arg(long, value_enum, default_value = "created-at")]
        sort: MediaSortArg,
        /// Sort direction
        #[arg(long, value_enum, default_value = "desc")]
        direction: DirectionArg,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u64,
        /// Page size (0 for the default)
        #[arg(long, default_value = "0")]
        page_size: u64,
    },
    /// Print a time-limited download URL
    Url {
        /// Media ID
        id: String,
        /// URL lifetime in seconds (0 for the configured default)
        #[arg(short, long, default_value = "0")]
        ttl_seconds: u64,
    },
    /// Delete an asset and its stored object
    Delete {
        /// Media ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Media sort field flag
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MediaSortArg {
    CreatedAt,
    Bytes,
}

impl From<MediaSortArg> for MediaSortField {
    fn from(arg: MediaSortArg) -> Self {
        match arg {
            MediaSortArg::CreatedAt => MediaSortField::CreatedAt,
            MediaSortArg::Bytes => MediaSortField::Bytes,
        }
    }
}

/// Media display row
#[derive(Debug, Serialize, Tabled)]
struct MediaRow {
    /// Media ID
    id: String,
    /// Kind
    kind: String,
    /// Original filename
    name: String,
    /// Size in bytes
    bytes: i64,
    /// Digest prefix
    sha256: String,
    /// Storage key
    storage_key: String,
}

impl From<&MediaAsset> for MediaRow {
    fn from(m: &MediaAsset) -> Self {
        Self {
            id: m.id.to_string(),
            kind: m.kind.to_string(),
            name: m.original_name.clone(),
            bytes: m.bytes,
            sha256: m.sha256.chars().take(12).collect(),
            storage_key: m.storage_key.clone(),
        }
    }
}

fn print_assets(assets: &[MediaAsset], format: OutputFormat) {
    let rows: Vec<MediaRow> = assets.iter().map(MediaRow::from).collect();
    output::print_list(&rows, assets, format);
}

/// MIME type for common image and audio extensions.
fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

async fn open_upload(
    path: &Path,
    options: &UploadOptions,
    folder_id: Option<Uuid>,
    uploaded_by: Option<Uuid>,
) -> Result<UploadMediaRequest<tokio::fs::File>, AppError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| AppError::validation(format!("Cannot open {}: {e}", path.display())))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(UploadMediaRequest {
        content: file,
        filename,
        mime_type: options
            .mime_type
            .clone()
            .unwrap_or_else(|| guess_mime_type(path).to_string()),
        kind: options.kind.clone(),
        uploaded_by,
        folder_id,
        duration_ms: options.duration_ms,
    })
}

/// Outcome of one file in a batch upload, as printed in JSON mode.
#[derive(Debug, Serialize)]
struct BatchItem<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<&'a MediaAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> BatchItem<'a> {
    fn new(path: &Path, result: &'a Result<MediaAsset, AppError>) -> Self {
        let (media, error) = match result {
            Ok(asset) => (Some(asset), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            path: path.display().to_string(),
            media,
            error,
        }
    }
}

/// Upload `paths` in order, one result per path. A file that cannot be
/// opened fails only its own slot.
async fn upload_batch(
    ctx: &CatalogContext,
    paths: &[PathBuf],
    options: &UploadOptions,
    folder_id: Option<Uuid>,
    uploaded_by: Option<Uuid>,
) -> Vec<Result<MediaAsset, AppError>> {
    let mut slots = Vec::with_capacity(paths.len());
    let mut requests = Vec::with_capacity(paths.len());
    for path in paths {
        match open_upload(path, options, folder_id, uploaded_by).await {
            Ok(request) => {
                slots.push(None);
                requests.push(request);
            }
            Err(e) => slots.push(Some(e)),
        }
    }

    let mut uploaded = ctx.media.upload_media_batch(requests).await.into_iter();
    slots
        .into_iter()
        .map(|slot| match slot {
            Some(open_error) => Err(open_error),
            None => uploaded.next().unwrap_or_else(|| {
                Err(AppError::internal("Batch upload returned fewer results than requested"))
            }),
        })
        .collect()
}

/// Execute media commands
pub async fn execute(
    args: &MediaArgs,
    ctx: &CatalogContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        MediaCommand::Upload { path, options } => {
            let folder_id = parse_opt_id(options.folder_id.as_ref(), "folder")?;
            let uploaded_by = parse_opt_id(options.uploaded_by.as_ref(), "uploader")?;
            let request = open_upload(path, options, folder_id, uploaded_by).await?;

            let asset = ctx.media.upload_media(request).await?;
            match format {
                OutputFormat::Json => output::print_json(&asset),
                OutputFormat::Table => {
                    output::print_success(&format!("Stored {}", asset.storage_key));
                    output::print_kv("id", &asset.id.to_string());
                    output::print_kv("sha256", &asset.sha256);
                }
            }
        }
        MediaCommand::UploadBatch { paths, options } => {
            let folder_id = parse_opt_id(options.folder_id.as_ref(), "folder")?;
            let uploaded_by = parse_opt_id(options.uploaded_by.as_ref(), "uploader")?;

            let results = upload_batch(ctx, paths, options, folder_id, uploaded_by).await;
            let failures = results.iter().filter(|r| r.is_err()).count();

            match format {
                OutputFormat::Json => {
                    let items: Vec<BatchItem<'_>> = paths
                        .iter()
                        .zip(&results)
                        .map(|(path, result)| BatchItem::new(path, result))
                        .collect();
                    output::print_json(&items);
                }
                OutputFormat::Table => {
                    for (path, result) in paths.iter().zip(&results) {
                        match result {
                            Ok(asset) => output::print_success(&format!(
                                "{} -> {} ({})",
                                path.display(),
                                asset.storage_key,
                                asset.id
                            )),
                            Err(e) => output::print_error(&format!("{}: {e}", path.display())),
                        }
                    }
                }
            }

            if failures > 0 {
                return Err(AppError::internal(format!(
                    "{failures} of {} uploads failed",
                    paths.len()
                )));
            }
        }
        MediaCommand::Get { ids } => {
            let ids = ids
                .iter()
                .map(|id| parse_id(id, "media"))
                .collect::<Result<Vec<_>, _>>()?;

            if let [id] = ids.as_slice() {
                let asset = ctx.media.get_media_by_id(*id).await?;
                output::print_item(&asset, format);
            } else {
                let assets = ctx.media.get_media_by_ids(&ids).await?;
                print_assets(&assets, format);
            }
        }
        MediaCommand::List {
            folder_id,
            kind,
            uploaded_by,
            sha256,
            name,
            sort,
            direction,
            page,
            page_size,
        } => {
            let filter = MediaFilter {
                folder_id: parse_opt_id(folder_id.as_ref(), "folder")?,
                kind: kind.as_deref().map(str::parse::<MediaKind>).transpose()?,
                uploaded_by: parse_opt_id(uploaded_by.as_ref(), "uploader")?,
                sha256: sha256.clone(),
                original_name: name.clone(),
            };
            let sort = MediaSort {
                field: (*sort).into(),
                direction: (*direction).into(),
            };

            let response = ctx
                .media
                .list_media(&filter, sort, PageRequest::new(*page, *page_size))
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => {
                    print_assets(&response.items, format);
                    println!(
                        "Page {}/{} ({} assets)",
                        response.page, response.total_pages, response.total_items
                    );
                }
            }
        }
        MediaCommand::Url { id, ttl_seconds } => {
            let url = ctx
                .media
                .get_presigned_url(parse_id(id, "media")?, Some(Duration::from_secs(*ttl_seconds)))
                .await?;
            println!("{url}");
        }
        MediaCommand::Delete { id, force } => {
            let id = parse_id(id, "media")?;

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete media {id} and its stored object?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            ctx.media.delete_media(id).await?;
            output::print_success(&format!("Media {id} deleted"));
        }
    }

    Ok(())
}
