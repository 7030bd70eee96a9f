//! CLI command definitions and dispatch.

pub mod folder;
pub mod media;
pub mod migrate;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use catalog_core::config::AppConfig;
use catalog_core::error::AppError;
use catalog_core::types::SortDirection;
use catalog_database::DatabasePool;
use catalog_service::CatalogContext;

use crate::output::OutputFormat;

/// Content catalog: folders and content-addressed media
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to apply on top of default.toml
    #[arg(short, long, default_value = "development", env = "CATALOG_ENV")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Use in-memory stores instead of PostgreSQL and S3
    #[arg(long)]
    pub ephemeral: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply database migrations
    Migrate,
    /// Folder management
    Folder(folder::FolderArgs),
    /// Media management
    Media(media::MediaArgs),
}

/// Sort direction flag shared by list commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DirectionArg {
    #[default]
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => SortDirection::Asc,
            DirectionArg::Desc => SortDirection::Desc,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(config, self.ephemeral).await,
            Commands::Folder(args) => {
                let (ctx, pool) = open_catalog(config, self.ephemeral).await?;
                let result = folder::execute(args, &ctx, self.format).await;
                close(pool).await;
                result
            }
            Commands::Media(args) => {
                let (ctx, pool) = open_catalog(config, self.ephemeral).await?;
                let result = media::execute(args, &ctx, self.format).await;
                close(pool).await;
                result
            }
        }
    }
}

/// Build the service stack, returning the pool so it can be closed.
async fn open_catalog(
    config: &AppConfig,
    ephemeral: bool,
) -> Result<(CatalogContext, Option<DatabasePool>), AppError> {
    if ephemeral {
        tracing::debug!("Using in-memory catalog");
        return Ok((CatalogContext::ephemeral(config), None));
    }

    let pool = DatabasePool::connect(&config.database).await?;
    let ctx = CatalogContext::connect(config, &pool).await?;
    Ok((ctx, Some(pool)))
}

async fn close(pool: Option<DatabasePool>) {
    if let Some(pool) = pool {
        pool.close().await;
    }
}

/// Helper: parse a UUID argument
pub fn parse_id(value: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value.trim())
        .map_err(|e| AppError::validation(format!("Invalid {what} ID '{value}': {e}")))
}

/// Helper: parse an optional UUID argument
pub fn parse_opt_id(value: Option<&String>, what: &str) -> Result<Option<Uuid>, AppError> {
    value.map(|v| parse_id(v, what)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::error::ErrorKind;

    #[test]
    fn test_parse_id_rejects_garbage() {
        let err = parse_id("not-a-uuid", "folder").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("folder"));
    }

    #[test]
    fn test_parse_id_trims() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&format!(" {id} "), "media").unwrap(), id);
        assert_eq!(parse_opt_id(None, "folder").unwrap(), None);
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "catalog",
            "--ephemeral",
            "--format",
            "json",
            "folder",
            "roots",
        ])
        .unwrap();
        assert!(cli.ephemeral);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, "config");
        assert!(matches!(cli.command, Commands::Folder(_)));
    }
}
