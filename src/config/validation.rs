//! Configuration validation.

use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate a merged configuration before any network or filesystem work.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.options.request_timeout_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "options.request_timeout_seconds".to_string(),
            message: "timeout must be greater than zero".to_string(),
        });
    }

    if !config.api.base_url.is_empty() {
        let url = Url::parse(&config.api.base_url).map_err(|e| Error::ConfigValidation {
            field: "api.base_url".to_string(),
            message: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::ConfigValidation {
                field: "api.base_url".to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
    }

    if let Some(dir) = &config.options.save_directory {
        if dir.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                field: "options.save_directory".to_string(),
                message: "directory may not be empty".to_string(),
            });
        }
    }

    Ok(())
}
