//! The directory-listing collaborator used to discover raw URLs of private files.

use crate::repo::Repo;
use serde::{Deserialize, Serialize};

/// A file reported by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFile {
    /// Repository-relative path.
    pub path: String,
    /// Raw-content URL of the file, absent for directories and submodules.
    pub download_url: Option<String>,
    /// File body, only filled when [`ListOptions::include_content`] is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RepoFile {
    pub fn new(path: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            download_url: Some(download_url.into()),
            content: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Whether the body of every listed file should be fetched as well.
    pub include_content: bool,
}

/// Error type for directory listings.
///
/// Cloneable so that one failed listing can be handed to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("Directory not found: {0}")]
    NotFound(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Lists the contents of a directory in a hosted repository.
#[async_trait::async_trait]
pub trait DirectoryLister: Send + Sync {
    async fn list_directory(
        &self,
        repo: &Repo,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<RepoFile>, ListError>;
}
