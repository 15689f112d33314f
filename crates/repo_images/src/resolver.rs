//! Resolving relative image paths to raw-content URLs.
//!
//! Public repositories follow a fixed URL template. Raw URLs of private files carry
//! access tokens and can only be discovered by listing the parent directory, so the
//! resolver keeps a [`DirectoryCache`] in front of the [`DirectoryLister`]:
//!
//! - a directory is listed at most once per TTL window;
//! - concurrent lookups under the same directory share one listing request.

use crate::cache::{DirectoryCache, PendingListing, DEFAULT_TTL};
use crate::img_src::{img_srcs, replace_first_src};
use crate::lister::{DirectoryLister, ListError, ListOptions, RepoFile};
use crate::repo::{parent_dir, Repo};
use crate::rewrite::is_relative;
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn from_private(is_private: bool) -> Self {
        if is_private {
            Self::Private
        } else {
            Self::Public
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to list {dir}: {source}")]
    Listing { dir: String, source: ListError },
}

pub struct Resolver {
    cache: Arc<Mutex<DirectoryCache>>,
    lister: Arc<dyn DirectoryLister>,
    ttl: Duration,
}

impl Resolver {
    pub fn new(lister: Arc<dyn DirectoryLister>) -> Self {
        Self {
            cache: Arc::new(Mutex::new(DirectoryCache::new())),
            lister,
            ttl: DEFAULT_TTL,
        }
    }

    /// Overrides how long a directory listing stays fresh.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the raw URL of `path` if it is already known, without listing anything.
    pub fn cached_url(&self, repo: &Repo, path: &str) -> Option<String> {
        self.cache.lock().url(&repo.qualified(path))
    }

    /// Seeds the cache with the raw URLs of `files`, e.g. from a listing made elsewhere.
    pub fn add_raw_urls(&self, repo: &Repo, files: &[RepoFile]) {
        if files.is_empty() {
            return;
        }
        let inserted = self.cache.lock().insert_files(repo, files);
        tracing::trace!(%repo, inserted, "Added raw urls");
    }

    /// Resolves `path` to its raw-content URL.
    ///
    /// Public repositories never fail and always yield a URL. For private ones the
    /// result is `None` when the parent directory listing does not contain `path`.
    pub async fn raw_url(
        &self,
        repo: &Repo,
        path: &str,
        visibility: Visibility,
    ) -> Result<Option<String>, ResolveError> {
        if visibility == Visibility::Public {
            return Ok(Some(repo.raw_url(path)));
        }

        let file = repo.qualified(path);
        let parent = parent_dir(path);
        let dir = repo.qualified(parent);

        let pending = {
            let mut cache = self.cache.lock();

            if cache.is_listed(&dir, self.ttl) {
                return Ok(cache.url(&file));
            }

            match cache.pending(&dir) {
                Some(pending) => {
                    tracing::debug!(%dir, "Joining in-flight listing");
                    pending
                }
                None => {
                    let pending = self.list_directory(repo, parent, dir.clone());
                    cache.insert_pending(dir.clone(), pending.clone());
                    pending
                }
            }
        };

        pending
            .await
            .map_err(|source| ResolveError::Listing { dir, source })?;

        Ok(self.cache.lock().url(&file))
    }

    /// Starts listing `parent`; the returned future updates the cache when it settles.
    ///
    /// The in-flight marker is cleared whatever the outcome, and only a successful
    /// listing stamps the directory as listed, so a failure is retried on next lookup.
    fn list_directory(&self, repo: &Repo, parent: &str, dir: String) -> PendingListing {
        let cache = Arc::clone(&self.cache);
        let lister = Arc::clone(&self.lister);
        let repo = repo.clone();
        let parent = parent.to_string();

        tracing::info!(%dir, "Listing directory");

        async move {
            let result = lister
                .list_directory(
                    &repo,
                    &parent,
                    ListOptions {
                        include_content: false,
                    },
                )
                .await;

            let mut cache = cache.lock();
            cache.remove_pending(&dir);

            match result {
                Ok(files) => {
                    let inserted = cache.insert_files(&repo, &files);
                    tracing::debug!(%dir, files = files.len(), inserted, "Directory listed");
                    cache.mark_listed(dir);
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!(%dir, ?err, "Failed to list directory");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Replaces every relative `<img>` source in `html` with its raw-content URL.
    ///
    /// Sources are resolved one after another. Those that cannot be resolved are left
    /// as they are.
    pub async fn relative_to_raw_urls(
        &self,
        repo: &Repo,
        html: &str,
        visibility: Visibility,
    ) -> Result<String, ResolveError> {
        let mut output = html.to_string();

        for m in img_srcs(html) {
            if !is_relative(m.src) {
                continue;
            }
            if let Some(url) = self.raw_url(repo, m.src, visibility).await? {
                output = replace_first_src(&output, &m, &url);
            }
        }

        Ok(output)
    }

    #[cfg(test)]
    fn is_pending(&self, repo: &Repo, dir: &str) -> bool {
        self.cache.lock().is_pending(&repo.qualified(dir))
    }
}
