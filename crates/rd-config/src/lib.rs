//! # rd-config
//!
//! Layered settings for the Ruddit binary.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. `RUDDIT__SECTION__KEY` environment variables (a `.env` file is honoured)

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub log: LogSettings,
    /// Identity to act as; unset means browsing anonymously
    #[serde(default)]
    pub viewer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GatewaySettings {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Sent as `Authorization: Apikey <key>` when present
    #[serde(default)]
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. "info" or "rd_core=debug"
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

const DEFAULTS: &str = r#"
[gateway]
endpoint = "http://127.0.0.1:5001/graphql"
timeout_secs = 10

[log]
filter = "info"
json = false
"#;

impl Settings {
    /// Loads settings from defaults, `path` (if it exists), and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));

        if let Some(path) = path {
            debug!(path = %path.display(), "reading config file");
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("RUDDIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from a TOML document layered over the defaults.
    /// Environment variables are not consulted.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.gateway.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "gateway.endpoint",
                message: "cannot be empty".to_string(),
            });
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                name: "gateway.endpoint",
                message: format!("expected an http(s) URL, got {endpoint:?}"),
            });
        }
        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "gateway.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if matches!(self.viewer.as_deref(), Some(v) if v.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                name: "viewer",
                message: "cannot be blank; leave it unset to browse anonymously".to_string(),
            });
        }
        Ok(())
    }
}
