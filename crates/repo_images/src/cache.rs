//! Per-directory cache of raw URLs discovered through directory listings.

use crate::lister::{ListError, RepoFile};
use crate::repo::Repo;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Default time after which a directory listing is considered stale.
pub const DEFAULT_TTL: Duration = Duration::from_millis(10_000);

/// A directory listing in progress, awaitable by any number of callers.
///
/// The future records its own outcome in the cache, so awaiting it only tells
/// whether the listing succeeded.
pub type PendingListing = Shared<BoxFuture<'static, Result<(), ListError>>>;

/// All keys are fully-qualified paths, see [`Repo::qualified`].
#[derive(Default)]
pub struct DirectoryCache {
    /// File path -> raw URL. Only ever added to or overwritten.
    urls: HashMap<String, String>,
    /// Directory path -> time its last listing completed.
    listed_at: HashMap<String, Instant>,
    /// Directory path -> listing currently in flight.
    in_flight: HashMap<String, PendingListing>,
}

impl std::fmt::Debug for DirectoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCache")
            .field("urls", &self.urls)
            .field("listed_at", &self.listed_at)
            .field("in_flight", &self.in_flight.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self, qualified_path: &str) -> Option<String> {
        self.urls.get(qualified_path).cloned()
    }

    /// Records the raw URL of every file in `files`; entries without one are skipped.
    ///
    /// Returns the number of URLs recorded.
    pub fn insert_files(&mut self, repo: &Repo, files: &[RepoFile]) -> usize {
        let mut inserted = 0;
        for file in files {
            if let Some(download_url) = &file.download_url {
                self.urls
                    .insert(repo.qualified(&file.path), download_url.clone());
                inserted += 1;
            }
        }
        inserted
    }

    /// Returns `true` if `dir` was listed less than `ttl` ago.
    ///
    /// An expired marker is dropped on the way.
    pub fn is_listed(&mut self, dir: &str, ttl: Duration) -> bool {
        match self.listed_at.get(dir) {
            Some(listed_at) if listed_at.elapsed() > ttl => {
                self.listed_at.remove(dir);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn mark_listed(&mut self, dir: String) {
        self.listed_at.insert(dir, Instant::now());
    }

    pub fn pending(&self, dir: &str) -> Option<PendingListing> {
        self.in_flight.get(dir).cloned()
    }

    pub fn insert_pending(&mut self, dir: String, pending: PendingListing) {
        self.in_flight.insert(dir, pending);
    }

    pub fn remove_pending(&mut self, dir: &str) {
        self.in_flight.remove(dir);
    }

    pub fn is_pending(&self, dir: &str) -> bool {
        self.in_flight.contains_key(dir)
    }
}
