//! Repository coordinates and the raw-content URL template.

use std::fmt;

/// Host serving raw file contents of public repositories.
pub const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com";

/// A branch of a hosted repository.
///
/// Paths passed to its methods are repository-relative, `/`-separated and carry no
/// leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl Repo {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/`
    pub fn raw_url_prefix(&self) -> String {
        format!("{RAW_CONTENT_HOST}/{}/{}/{}/", self.owner, self.name, self.branch)
    }

    /// Raw-content URL of `path` in a public repository.
    pub fn raw_url(&self, path: &str) -> String {
        format!("{}{path}", self.raw_url_prefix())
    }

    /// Strips the raw-content URL prefix of this repo from `url`, dropping any query
    /// string. Anything else is returned unchanged.
    pub fn relative_url<'a>(&self, url: &'a str) -> &'a str {
        match url.strip_prefix(self.raw_url_prefix().as_str()) {
            Some(relative) => relative
                .split_once('?')
                .map_or(relative, |(path, _query)| path),
            None => url,
        }
    }

    /// Fully-qualified form of `path`: `owner/repo/branch/path`.
    ///
    /// The repository root (empty `path`) qualifies to `owner/repo/branch`.
    pub fn qualified(&self, path: &str) -> String {
        if path.is_empty() {
            self.to_string()
        } else {
            format!("{self}/{path}")
        }
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.name, self.branch)
    }
}

/// Parent directory of a repository-relative path, `""` for top level entries.
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Free-function form of [`Repo::relative_url`].
pub fn relative_url<'a>(repo: &Repo, path: &'a str) -> &'a str {
    repo.relative_url(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> Repo {
        Repo::new("o", "r", "main")
    }

    #[test]
    fn test_raw_url() {
        assert_eq!(
            repo().raw_url("docs/a.png"),
            "https://raw.githubusercontent.com/o/r/main/docs/a.png"
        );
    }

    #[test]
    fn test_relative_url_inverts_raw_url() {
        let repo = repo();
        for path in ["a.png", "docs/a.png", "deep/er/x y.gif"] {
            assert_eq!(repo.relative_url(&repo.raw_url(path)), path);
        }
    }

    #[test]
    fn test_relative_url_drops_query() {
        let url = "https://raw.githubusercontent.com/o/r/main/docs/a.png?token=abc&x=1";
        assert_eq!(repo().relative_url(url), "docs/a.png");
    }

    #[test]
    fn test_relative_url_other_repo_untouched() {
        let url = "https://raw.githubusercontent.com/o/other/main/a.png?token=abc";
        assert_eq!(repo().relative_url(url), url);
        assert_eq!(repo().relative_url("docs/a.png"), "docs/a.png");
    }

    #[test]
    fn test_qualified_and_parent() {
        let repo = repo();
        assert_eq!(repo.qualified("docs/a.png"), "o/r/main/docs/a.png");
        assert_eq!(repo.qualified(parent_dir("docs/a.png")), "o/r/main/docs");
        assert_eq!(repo.qualified(parent_dir("a.png")), "o/r/main");
        assert_eq!(parent_dir("a/b/c.png"), "a/b");
    }
}
