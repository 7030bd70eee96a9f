//! Folder management CLI commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use catalog_core::error::AppError;
use catalog_entity::folder::{Folder, FolderFilter, FolderNode, FolderSort, FolderSortField};
use catalog_service::{CatalogContext, CreateFolderRequest, ListFoldersRequest};

use super::{DirectionArg, parse_id, parse_opt_id};
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for a root folder)
        #[arg(short, long)]
        parent_id: Option<String>,
    },
    /// Show a folder
    Get {
        /// Folder ID
        id: String,
    },
    /// Show a folder with child and media counts
    Summary {
        /// Folder ID
        id: String,
    },
    /// List root folders
    Roots,
    /// List the direct children of a folder
    Children {
        /// Parent folder ID
        id: String,
    },
    /// List folders with filters and paging
    List {
        /// Only children of this folder
        #[arg(short, long)]
        parent_id: Option<String>,
        /// Only folders at this depth
        #[arg(short, long)]
        depth: Option<i32>,
        /// Case-insensitive name substring
        #[arg(short, long)]
        search: Option<String>,
        /// Sort field
        #[arg(long, value_enum, default_value = "name")]
        sort: FolderSortArg,
        /// Sort direction
        #[arg(long, value_enum, default_value = "asc")]
        direction: DirectionArg,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u64,
        /// Page size (0 for the configured default)
        #[arg(long, default_value = "0")]
        page_size: u64,
    },
    /// Show a folder and all of its descendants
    Tree {
        /// Root of the subtree
        id: String,
    },
    /// Show the ancestor chain of a folder
    Path {
        /// Folder ID
        id: String,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: String,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete an empty folder
    Delete {
        /// Folder ID
        id: String,
    },
}

/// Folder sort field flag
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FolderSortArg {
    Name,
    CreatedAt,
}

impl From<FolderSortArg> for FolderSortField {
    fn from(arg: FolderSortArg) -> Self {
        match arg {
            FolderSortArg::Name => FolderSortField::Name,
            FolderSortArg::CreatedAt => FolderSortField::CreatedAt,
        }
    }
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent
    parent: String,
    /// Depth
    depth: i32,
    /// Created at
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent: f
                .parent_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            depth: f.depth,
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn print_folders(folders: &[Folder], format: OutputFormat) {
    let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
    output::print_list(&rows, folders, format);
}

/// Render a subtree as indented lines.
fn render_tree(node: &FolderNode, indent: usize, out: &mut String) {
    out.push_str(&format!(
        "{}{} ({})\n",
        "  ".repeat(indent),
        node.folder.name,
        node.folder.id
    ));
    for child in &node.children {
        render_tree(child, indent + 1, out);
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    ctx: &CatalogContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FolderCommand::Create { name, parent_id } => {
            let parent_id = parse_opt_id(parent_id.as_ref(), "parent folder")?;
            let folder = ctx
                .folders
                .create_folder(CreateFolderRequest {
                    name: name.clone(),
                    parent_id,
                    depth: None,
                })
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&folder),
                OutputFormat::Table => output::print_success(&format!(
                    "Folder '{}' created (id: {}, depth: {})",
                    folder.name, folder.id, folder.depth
                )),
            }
        }
        FolderCommand::Get { id } => {
            let folder = ctx.folders.get_folder(parse_id(id, "folder")?).await?;
            output::print_item(&folder, format);
        }
        FolderCommand::Summary { id } => {
            let summary = ctx
                .folders
                .get_folder_summary(parse_id(id, "folder")?)
                .await?;
            output::print_item(&summary, format);
        }
        FolderCommand::Roots => {
            let folders = ctx.folders.get_root_folders().await?;
            print_folders(&folders, format);
        }
        FolderCommand::Children { id } => {
            let folders = ctx.folders.get_subfolders(parse_id(id, "folder")?).await?;
            print_folders(&folders, format);
        }
        FolderCommand::List {
            parent_id,
            depth,
            search,
            sort,
            direction,
            page,
            page_size,
        } => {
            let response = ctx
                .folders
                .list_folders(ListFoldersRequest {
                    filter: FolderFilter {
                        parent_id: parse_opt_id(parent_id.as_ref(), "parent folder")?,
                        depth: *depth,
                        search: search.clone(),
                    },
                    sort: FolderSort {
                        field: (*sort).into(),
                        direction: (*direction).into(),
                    },
                    page: *page,
                    page_size: *page_size,
                })
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => {
                    print_folders(&response.items, format);
                    println!(
                        "Page {}/{} ({} folders)",
                        response.page, response.total_pages, response.total_items
                    );
                }
            }
        }
        FolderCommand::Tree { id } => {
            let tree = ctx
                .tree
                .get_folder_with_children(parse_id(id, "folder")?)
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&tree),
                OutputFormat::Table => {
                    let mut rendered = String::new();
                    render_tree(&tree, 0, &mut rendered);
                    print!("{rendered}");
                }
            }
        }
        FolderCommand::Path { id } => {
            let path = ctx.tree.get_folder_path(parse_id(id, "folder")?).await?;

            match format {
                OutputFormat::Json => output::print_json(&path),
                OutputFormat::Table => {
                    let names: Vec<&str> = path.iter().map(|f| f.name.as_str()).collect();
                    println!("/{}", names.join("/"));
                }
            }
        }
        FolderCommand::Rename { id, name } => {
            let folder = ctx
                .folders
                .update_folder(parse_id(id, "folder")?, name)
                .await?;
            output::print_success(&format!("Folder {} renamed to '{}'", folder.id, folder.name));
        }
        FolderCommand::Delete { id } => {
            let id = parse_id(id, "folder")?;
            ctx.folders.delete_folder(id).await?;
            output::print_success(&format!("Folder {id} deleted"));
        }
    }

    Ok(())
}
