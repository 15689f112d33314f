//! Synchronous `<img>` source rewriting: path prefixes and raw URL to relative path.
//!
//! Every function here rewrites by textual substitution of the first occurrence of
//! each matched `src` attribute, leaving the rest of the document byte-for-byte
//! intact. Prefix arguments are optional; when one is missing (or empty) the input
//! comes back unchanged.

use crate::img_src::{img_srcs, replace_first_src};
use crate::repo::Repo;

/// Returns `true` if `src` is a repository-relative path, i.e. neither rooted at `/`
/// nor an `http(s)://` URL nor an inline `data:image/` URI.
pub fn is_relative(src: &str) -> bool {
    !(src.starts_with('/')
        || src.starts_with("http://")
        || src.starts_with("https://")
        || src.starts_with("data:image/"))
}

fn is_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:")
}

/// Strips the literal leading `prefix` from `src`.
///
/// A protocol-relative `//host/...` source never matches a prefix that is itself not
/// protocol-relative, so `/` does not swallow the first slash of `//`.
fn strip_literal_prefix<'a>(src: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    if src.starts_with("//") && !prefix.starts_with("//") {
        return None;
    }
    src.strip_prefix(prefix)
}

/// Like [`strip_literal_prefix`], but URLs and data URIs never qualify.
fn strip_src_prefix<'a>(src: &'a str, prefix: &str) -> Option<&'a str> {
    if is_url(src) {
        return None;
    }
    strip_literal_prefix(src, prefix)
}

/// Replaces the leading `from` of a single path with `to`.
///
/// # Example
///
/// ```
/// use repo_images::swap_prefix;
///
/// assert_eq!(swap_prefix("/old/a.png", Some("/old"), Some("/new")), "/new/a.png");
/// assert_eq!(swap_prefix("//old/a.png", Some("/"), Some("/new/")), "//old/a.png");
/// assert_eq!(swap_prefix("/old/a.png", None, Some("/new")), "/old/a.png");
/// ```
pub fn swap_prefix(path: &str, from: Option<&str>, to: Option<&str>) -> String {
    let (Some(from), Some(to)) = (from, to) else {
        return path.to_string();
    };

    match strip_src_prefix(path, from) {
        Some(rest) => format!("{to}{rest}"),
        None => path.to_string(),
    }
}

/// Applies [`swap_prefix`] to every `<img>` source in `html`.
///
/// # Example
///
/// ```
/// use repo_images::html_swap_prefix;
///
/// let html = r#"<img src="/old/a.png">"#;
/// assert_eq!(html_swap_prefix(html, Some("/old"), Some("/new")), r#"<img src="/new/a.png">"#);
/// ```
pub fn html_swap_prefix(html: &str, from: Option<&str>, to: Option<&str>) -> String {
    let (Some(from), Some(to)) = (from, to) else {
        return html.to_string();
    };

    let mut output = html.to_string();
    for m in img_srcs(html) {
        if let Some(rest) = strip_src_prefix(m.src, from) {
            output = replace_first_src(&output, &m, &format!("{to}{rest}"));
        }
    }
    output
}

/// Strips the literal leading `prefix` from every `<img>` source carrying it.
///
/// Unlike the swap functions this also applies to URLs, e.g. a CDN prefix.
pub fn remove_prefix(html: &str, prefix: Option<&str>) -> String {
    let Some(prefix) = prefix else {
        return html.to_string();
    };

    let mut output = html.to_string();
    for m in img_srcs(html) {
        if let Some(rest) = strip_literal_prefix(m.src, prefix) {
            output = replace_first_src(&output, &m, rest);
        }
    }
    output
}

/// Prepends `prefix` to every relative `<img>` source, see [`is_relative`].
///
/// Absolute paths, URLs and data URIs are left alone, so [`remove_prefix`] with the
/// same prefix restores the original document.
///
/// # Example
///
/// ```
/// use repo_images::{add_prefix, remove_prefix};
///
/// let html = r#"<img src="images/a.png"><img src="https://x/b.png">"#;
/// let prefixed = add_prefix(html, Some("/files/"));
/// assert_eq!(prefixed, r#"<img src="/files/images/a.png"><img src="https://x/b.png">"#);
/// assert_eq!(remove_prefix(&prefixed, Some("/files/")), html);
/// ```
pub fn add_prefix(html: &str, prefix: Option<&str>) -> String {
    let Some(prefix) = prefix.filter(|p| !p.is_empty()) else {
        return html.to_string();
    };

    let mut output = html.to_string();
    for m in img_srcs(html) {
        if is_relative(m.src) {
            output = replace_first_src(&output, &m, &format!("{prefix}{}", m.src));
        }
    }
    output
}

/// Turns every raw-content URL of `repo` back into a repository-relative path.
///
/// Query strings on those URLs are dropped; sources pointing elsewhere are kept.
pub fn raw_to_relative_urls(repo: &Repo, html: &str) -> String {
    let prefix = repo.raw_url_prefix();

    let mut output = html.to_string();
    for m in img_srcs(html) {
        if m.src.starts_with(&prefix) {
            output = replace_first_src(&output, &m, repo.relative_url(m.src));
        }
    }
    output
}
