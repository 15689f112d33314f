//! Directory listings through the GitHub contents API.
//!
//! <https://docs.github.com/en/rest/repos/contents>

use repo_images::{DirectoryLister, ListError, ListOptions, Repo, RepoFile};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "repo-images";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub download_url: Option<String>,
}

impl From<ContentEntry> for RepoFile {
    fn from(entry: ContentEntry) -> Self {
        Self {
            path: entry.path,
            download_url: entry.download_url,
            content: None,
        }
    }
}

/// The endpoint answers with an array for directories and a single object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Contents {
    Dir(Vec<ContentEntry>),
    File(ContentEntry),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Parses the body of a contents response into file descriptors.
pub fn parse_contents(body: &str) -> Result<Vec<ContentEntry>, ListError> {
    match serde_json::from_str::<Contents>(body) {
        Ok(Contents::Dir(entries)) => Ok(entries),
        Ok(Contents::File(entry)) => Ok(vec![entry]),
        Err(e) => Err(ListError::Decode(e.to_string())),
    }
}

fn to_request_error(e: reqwest::Error) -> ListError {
    ListError::Request(e.to_string())
}

/// Only file entries carry a body worth fetching.
fn wants_content(options: ListOptions, entry: &ContentEntry) -> bool {
    options.include_content && entry.kind == EntryKind::File
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_base_url: String,
    user_agent: String,
    token: Option<String>,
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl GitHubClient {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token: None,
        }
    }

    /// Personal access token, needed to list private repositories.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Appends `segments` to the API base URL, percent-encoding each of them.
    fn api_url<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<reqwest::Url, ListError> {
        let mut url = reqwest::Url::parse(&self.api_base_url)
            .map_err(|e| ListError::Request(format!("{}: {e}", self.api_base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ListError::Request(format!("{} is not a base URL", self.api_base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn contents_url(&self, repo: &Repo, path: &str) -> Result<reqwest::Url, ListError> {
        let segments = ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]
            .into_iter()
            .chain(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.api_url(segments)?;
        url.query_pairs_mut().append_pair("ref", &repo.branch);
        Ok(url)
    }

    fn get(&self, url: &str, accept: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", &self.user_agent);

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, url: &str, accept: &str) -> Result<String, ListError> {
        let response = self.get(url, accept).send().await.map_err(to_request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(to_request_error)?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ListError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ListError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn request<T: DeserializeOwned>(&self, url: &str) -> Result<T, ListError> {
        let body = self.send(url, "application/vnd.github.v3+json").await?;
        serde_json::from_str(&body).map_err(|e| ListError::Decode(e.to_string()))
    }

    /// Lists the entries directly under `path`.
    pub async fn contents(&self, repo: &Repo, path: &str) -> Result<Vec<ContentEntry>, ListError> {
        let url = self.contents_url(repo, path)?;
        tracing::debug!(%url, "Requesting repository contents");
        let body = self.send(url.as_str(), "application/vnd.github.v3+json").await?;
        parse_contents(&body)
    }

    /// Fetches the body of a file from its raw-content URL.
    pub async fn file_content(&self, download_url: &str) -> Result<String, ListError> {
        self.send(download_url, "application/vnd.github.raw").await
    }

    /// Default branch of the repository, handy when no branch is given.
    pub async fn default_branch(&self, owner: &str, repo: &str) -> Result<String, ListError> {
        #[derive(Deserialize)]
        struct Repository {
            default_branch: String,
        }

        let url = self.api_url(["repos", owner, repo])?;
        self.request::<Repository>(url.as_str())
            .await
            .map(|r| r.default_branch)
    }
}

#[async_trait::async_trait]
impl DirectoryLister for GitHubClient {
    async fn list_directory(
        &self,
        repo: &Repo,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<RepoFile>, ListError> {
        let entries = self.contents(repo, path).await?;

        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            let fetch_content = wants_content(options, &entry);
            let mut file = RepoFile::from(entry);
            if fetch_content {
                if let Some(download_url) = &file.download_url {
                    file.content = Some(self.file_content(download_url).await?);
                }
            }
            files.push(file);
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_url() {
        let client = GitHubClient::new("https://api.github.com/");
        let repo = Repo::new("o", "r", "main");
        assert_eq!(
            client.contents_url(&repo, "docs/img").unwrap().as_str(),
            "https://api.github.com/repos/o/r/contents/docs/img?ref=main"
        );
        assert_eq!(
            client.contents_url(&repo, "").unwrap().as_str(),
            "https://api.github.com/repos/o/r/contents?ref=main"
        );
    }

    #[test]
    fn test_contents_url_is_encoded() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3");
        let repo = Repo::new("o", "r", "fix&ref=evil");
        assert_eq!(
            client.contents_url(&repo, "docs/a#b/c?d").unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/contents/docs/a%23b/c%3Fd?ref=fix%26ref%3Devil"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = GitHubClient::new("not a url");
        let repo = Repo::new("o", "r", "main");
        assert!(matches!(
            client.contents_url(&repo, "docs"),
            Err(ListError::Request(_))
        ));
    }

    fn entry(kind: EntryKind) -> ContentEntry {
        ContentEntry {
            path: "docs/a".into(),
            kind,
            download_url: Some("https://raw.githubusercontent.com/o/r/main/docs/a".into()),
        }
    }

    #[test]
    fn test_wants_content() {
        let with_content = ListOptions {
            include_content: true,
        };
        assert!(wants_content(with_content, &entry(EntryKind::File)));
        assert!(!wants_content(with_content, &entry(EntryKind::Dir)));
        assert!(!wants_content(with_content, &entry(EntryKind::Symlink)));
        assert!(!wants_content(with_content, &entry(EntryKind::Submodule)));
        assert!(!wants_content(ListOptions::default(), &entry(EntryKind::File)));
    }

    #[test]
    fn test_parse_directory_contents() {
        let body = r#"[
            {"name":"a.png","path":"docs/a.png","type":"file","size":10,
             "download_url":"https://raw.githubusercontent.com/o/r/main/docs/a.png?token=T"},
            {"name":"sub","path":"docs/sub","type":"dir","size":0,"download_url":null}
        ]"#;
        let entries = parse_contents(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].kind, EntryKind::Dir);

        let files: Vec<RepoFile> = entries.into_iter().map(Into::into).collect();
        assert_eq!(files[0].path, "docs/a.png");
        assert_eq!(
            files[0].download_url.as_deref(),
            Some("https://raw.githubusercontent.com/o/r/main/docs/a.png?token=T")
        );
        assert!(files[1].download_url.is_none());
    }

    #[test]
    fn test_parse_single_file_contents() {
        let body = r#"{"path":"README.md","type":"file","download_url":"https://x/README.md","content":"aGk="}"#;
        let entries = parse_contents(body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "README.md");
    }

    #[test]
    fn test_parse_invalid_contents() {
        assert!(matches!(
            parse_contents(r#"{"message":"Bad credentials"}"#),
            Err(ListError::Decode(_))
        ));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let client = GitHubClient::default().with_token(Some(String::new()));
        assert!(client.token.is_none());
    }
}
