//! Rewriting `<img>` sources in HTML rendered from hosted repositories.
//!
//! Image references in repository documents are relative paths. To display such a
//! document they have to point at raw-content URLs, and to store it back they have
//! to be relative again. This crate provides both directions plus helpers to add,
//! remove and swap path prefixes of image sources.
//!
//! # Modules
//!
//! - [`img_src`] - Regex based `<img src>` scanning
//! - [`repo`] - Repository coordinates and the raw-content URL template
//! - [`rewrite`] - Synchronous prefix and raw-to-relative rewriting
//! - [`lister`] - The directory-listing collaborator
//! - [`cache`] - Raw URLs discovered per directory, with TTL and in-flight tracking
//! - [`resolver`] - Relative-to-raw resolution for public and private repositories

pub mod cache;
pub mod img_src;
pub mod lister;
pub mod repo;
pub mod resolver;
pub mod rewrite;

pub use cache::{DirectoryCache, DEFAULT_TTL};
pub use img_src::{img_srcs, ImgSrc, Quote};
pub use lister::{DirectoryLister, ListError, ListOptions, RepoFile};
pub use repo::{parent_dir, relative_url, Repo, RAW_CONTENT_HOST};
pub use resolver::{ResolveError, Resolver, Visibility};
pub use rewrite::{
    add_prefix, html_swap_prefix, is_relative, raw_to_relative_urls, remove_prefix, swap_prefix,
};
