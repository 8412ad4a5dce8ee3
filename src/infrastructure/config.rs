use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub linear: LinearConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_feed_limit")]
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            limit: default_feed_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GithubConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// Author login used to filter commits server-side.
    #[serde(default)]
    pub username: Option<String>,
    /// Comma-separated "owner/repo" list.
    #[serde(default)]
    pub repositories: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinearConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_linear_api_url")]
    pub api_url: String,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_linear_api_url(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_refresh_interval_ms() -> u64 {
    30_000
}

fn default_feed_limit() -> usize {
    50
}

fn default_linear_api_url() -> String {
    "https://api.linear.app/graphql".to_string()
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/devfeed").required(false))
        .add_source(config::Environment::with_prefix("DEVFEED").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Split a comma-separated repository list, dropping empty entries.
pub fn parse_repositories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|repo| !repo.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repositories() {
        assert_eq!(
            parse_repositories("acme/web, acme/api ,acme/infra"),
            vec!["acme/web", "acme/api", "acme/infra"]
        );
    }

    #[test]
    fn test_parse_repositories_drops_empty_entries() {
        assert_eq!(parse_repositories(""), Vec::<String>::new());
        assert_eq!(parse_repositories("acme/web,,"), vec!["acme/web"]);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.feed.refresh_interval_ms, 30_000);
        assert_eq!(config.feed.limit, 50);
        assert!(config.github.token.is_none());
        assert_eq!(config.linear.api_url, "https://api.linear.app/graphql");
    }
}
