use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

static CONFIG: OnceCell<ConfigInner> = OnceCell::new();

#[derive(Debug)]
struct ConfigInner {
    config: Config,
    file_path: Option<PathBuf>,
}

pub struct LoadedConfig {
    pub config: Config,
    pub file_path: Option<PathBuf>,
    pub maybe_error: Option<toml::de::Error>,
}

/// Default location of the config file.
///
/// Linux: ~/.config/repo-images/config.toml
/// macOS: ~/Library/Application\ Support/io.repo-images.repo-images/config.toml
/// Windows: ~\AppData\Roaming\repo-images\repo-images\config\config.toml
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("io", "repo-images", "repo-images")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Parses the config file contents.
pub fn parse_config(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

fn read_config(config_file: &Path) -> (Config, Option<toml::de::Error>) {
    match std::fs::read_to_string(config_file) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        },
        Err(_) => (Config::default(), None),
    }
}

/// Loads the config from `specified_config_file` or the default location.
///
/// A missing file yields the default config; a malformed one yields the default config
/// along with the parse error.
pub fn load_config(specified_config_file: Option<PathBuf>) -> LoadedConfig {
    let file_path = specified_config_file.or_else(default_config_file);

    let (config, maybe_error) = match &file_path {
        Some(config_file) => read_config(config_file),
        None => (Config::default(), None),
    };

    LoadedConfig {
        config,
        file_path,
        maybe_error,
    }
}

/// Loads the config once for the whole process.
///
/// Later calls return the config loaded by the first one. Nothing is logged here as
/// this runs before the subscriber is installed; see [`config_file`].
pub fn load_config_on_startup(
    specified_config_file: Option<PathBuf>,
) -> (&'static Config, Option<toml::de::Error>) {
    let mut maybe_error = None;

    let inner = CONFIG.get_or_init(|| {
        let LoadedConfig {
            config,
            file_path,
            maybe_error: err,
        } = load_config(specified_config_file);
        maybe_error = err;
        ConfigInner { config, file_path }
    });

    (&inner.config, maybe_error)
}

/// Path of the config file picked by [`load_config_on_startup`], if any.
pub fn config_file() -> Option<&'static Path> {
    CONFIG.get().and_then(|inner| inner.file_path.as_deref())
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Specify the log file path.
    ///
    /// This path must be an absolute path.
    pub log_file: Option<String>,

    /// Specify the max log level.
    pub max_level: String,

    /// Specify the log target to enable more detailed logging.
    ///
    /// ```toml
    /// [log]
    /// log-target = "repo_images=trace,github_api=debug"
    /// ```
    pub log_target: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            max_level: "debug".into(),
            log_target: "".into(),
        }
    }
}

/// Directory listing cache.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CacheConfig {
    /// How long a directory listing stays fresh, in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_ms: 10_000 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// Base URL of the REST API, override it for GitHub Enterprise.
    pub api_base_url: String,

    /// User agent sent with every API request.
    pub user_agent: String,

    /// Personal access token, required to resolve images of private repositories.
    pub token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".into(),
            user_agent: "repo-images".into(),
            token: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Log configuration.
    pub log: LogConfig,

    /// Directory listing cache configuration.
    pub cache: CacheConfig,

    /// GitHub API configuration.
    pub github: GitHubConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize() {
        let toml_content = r#"
          [log]
          max-level = "trace"
          log-file = "/tmp/repo-images.log"

          [cache]
          ttl-ms = 2500

          [github]
          token = "ghp_secret"
"#;
        let config = parse_config(toml_content).unwrap();
        assert_eq!(
            config,
            Config {
                log: LogConfig {
                    log_file: Some("/tmp/repo-images.log".into()),
                    max_level: "trace".into(),
                    log_target: "".into(),
                },
                cache: CacheConfig { ttl_ms: 2500 },
                github: GitHubConfig {
                    token: Some("ghp_secret".into()),
                    ..Default::default()
                },
            }
        );
        assert_eq!(config.cache.ttl(), Duration::from_millis(2500));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cache.ttl(), Duration::from_millis(10_000));
        assert_eq!(config.github.api_base_url, "https://api.github.com");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(parse_config("[cache]\nttl = 5").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let loaded = load_config(Some(PathBuf::from("/nonexistent/repo-images/config.toml")));
        assert_eq!(loaded.config, Config::default());
        assert!(loaded.maybe_error.is_none());
    }

    #[test]
    fn test_startup_config_remembers_file() {
        let path = PathBuf::from("/nonexistent/repo-images/startup.toml");
        let (config, maybe_error) = load_config_on_startup(Some(path.clone()));
        assert_eq!(config, &Config::default());
        assert!(maybe_error.is_none());
        assert_eq!(config_file(), Some(path.as_path()));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = std::env::temp_dir().join(format!(
            "repo-images-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[cache]\nttl-ms = \"soon\"\n").unwrap();

        let loaded = load_config(Some(path.clone()));
        assert_eq!(loaded.config, Config::default());
        assert!(loaded.maybe_error.is_some());

        std::fs::remove_file(path).unwrap();
    }
}
