use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the catalog API, used for health checks and filtering.
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port_raw = load_or(&lookup, "PORT", "3000");
        let port = port_raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            key: "PORT",
            value: port_raw.clone(),
            reason: e.to_string(),
        })?;

        let api_url = load_or(&lookup, "API_URL", "http://localhost:8000");
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "API_URL",
                value: api_url,
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }

        Ok(Self { port, api_url })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn load_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
