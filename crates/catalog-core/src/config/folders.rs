//! Folder listing configuration.

use serde::{Deserialize, Serialize};

/// Paging bounds applied to folder listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    /// Page size used when the caller passes none (or a value below 1).
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound for any requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    100
}

fn default_max_page_size() -> u64 {
    200
}
