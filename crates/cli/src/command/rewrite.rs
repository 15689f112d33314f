use anyhow::Result;
use clap::Parser;
use github_api::GitHubClient;
use repo_images::{raw_to_relative_urls, Repo, Resolver, Visibility};
use repo_images_config::Config;
use std::sync::Arc;

#[derive(Parser, Debug, Clone)]
pub struct RepoArgs {
    /// Owner of the repository.
    #[clap(long)]
    owner: String,

    /// Name of the repository.
    #[clap(long)]
    repo: String,

    /// Branch the document belongs to, the default branch of the repository if omitted.
    #[clap(long)]
    branch: Option<String>,

    /// GitHub token, takes precedence over the one in the config file.
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl RepoArgs {
    fn client(&self, config: &Config) -> GitHubClient {
        let token = self.token.clone().or_else(|| config.github.token.clone());
        GitHubClient::new(&config.github.api_base_url)
            .with_user_agent(&config.github.user_agent)
            .with_token(token)
    }

    async fn repo(&self, client: &GitHubClient) -> Result<Repo> {
        let branch = match &self.branch {
            Some(branch) => branch.clone(),
            None => {
                let branch = client.default_branch(&self.owner, &self.repo).await?;
                tracing::debug!(%branch, "Using the default branch");
                branch
            }
        };
        Ok(Repo::new(&self.owner, &self.repo, branch))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ToRaw {
    #[clap(flatten)]
    repo: RepoArgs,

    /// The repository is private, raw URLs are discovered by listing directories.
    #[clap(long)]
    private: bool,
}

impl ToRaw {
    pub async fn run(&self, html: &str, config: &Config) -> Result<String> {
        let client = self.repo.client(config);
        let repo = self.repo.repo(&client).await?;

        let resolver = Resolver::new(Arc::new(client)).with_ttl(config.cache.ttl());
        let output = resolver
            .relative_to_raw_urls(&repo, html, Visibility::from_private(self.private))
            .await?;

        Ok(output)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ToRelative {
    #[clap(flatten)]
    repo: RepoArgs,
}

impl ToRelative {
    pub async fn run(&self, html: &str, config: &Config) -> Result<String> {
        let client = self.repo.client(config);
        let repo = self.repo.repo(&client).await?;
        Ok(raw_to_relative_urls(&repo, html))
    }
}
