use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, without the `/api` suffix
    pub api_url: String,
    /// Where the login token is persisted between runs
    pub token_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        let api_url = api_url.into();
        validate_url(&api_url)?;
        Ok(Self {
            api_url,
            token_file: None,
        })
    }

    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        let api_url = env::var("CMS_API_URL").map_err(|_| ConfigError::Missing("CMS_API_URL"))?;
        let mut config = Self::new(api_url)?;
        config.token_file = env::var("CMS_TOKEN_FILE").ok().map(PathBuf::from);
        Ok(config)
    }
}

fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_urls() {
        let config = ClientConfig::new("https://cms.example.com")
            .unwrap()
            .with_token_file("/tmp/token.json");
        assert_eq!(config.api_url, "https://cms.example.com");
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/token.json")));
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://cms.example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
