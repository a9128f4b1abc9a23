//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fs::paths::default_save_dir;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Resource library API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the community API.
    #[serde(default)]
    pub base_url: String,

    /// Bearer token for authenticated listings.
    #[serde(default)]
    pub authorization_token: Option<String>,

    /// User agent sent with all requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory where delivered files end up. Defaults to the user's
    /// downloads folder.
    #[serde(default)]
    pub save_directory: Option<PathBuf>,

    /// Ask before starting a download.
    #[serde(default = "default_true")]
    pub confirm_downloads: bool,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Network timeout applied to each request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            authorization_token: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            save_directory: None,
            confirm_downloads: true,
            show_downloads: true,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    format!("resource-downloader/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    120
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// The effective save directory: configured, or the platform default.
    pub fn save_directory(&self) -> Result<PathBuf> {
        match &self.options.save_directory {
            Some(dir) => Ok(dir.clone()),
            None => default_save_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.api.base_url.is_empty());
        assert!(config.options.confirm_downloads);
        assert!(config.options.show_downloads);
        assert_eq!(config.options.request_timeout_seconds, 120);
    }

    #[test]
    fn test_load_round_trip() {
        let content = r#"
[api]
base_url = "https://api.example.org"
authorization_token = "secret"

[options]
save_directory = "/downloads"
confirm_downloads = false
request_timeout_seconds = 30
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.org");
        assert_eq!(config.api.authorization_token.as_deref(), Some("secret"));
        assert_eq!(
            config.options.save_directory,
            Some(PathBuf::from("/downloads"))
        );
        assert!(!config.options.confirm_downloads);
        assert_eq!(config.options.request_timeout_seconds, 30);
    }
}
