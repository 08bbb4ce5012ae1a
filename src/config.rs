use crate::error::ExporterError;
use crate::translator::SrtField;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub nimble: NimbleConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen address, `host:port` or `:port` for all interfaces
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NimbleConfig {
    /// Base URL of the Nimble management API
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub auth_salt: String,
    #[serde(default = "empty_secret")]
    pub auth_hash: SecretString,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the log subscriber
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human readable text
    #[serde(alias = "plain", alias = "text")]
    #[value(aliases = ["plain", "text"])]
    Normal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    /// SRT fields emitted per sender/receiver, in output order
    #[serde(default = "default_srt_fields")]
    pub srt_fields: Vec<SrtField>,
}

fn default_listen() -> String {
    ":9017".to_string()
}

fn default_address() -> String {
    "http://127.0.0.1:8082".to_string()
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new().into())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_srt_fields() -> Vec<SrtField> {
    SrtField::DEFAULT.to_vec()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for NimbleConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            auth_salt: String::new(),
            auth_hash: empty_secret(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            srt_fields: default_srt_fields(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind, expanding `:port` to `0.0.0.0:port`.
    pub fn bind_addr(&self) -> String {
        if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        }
    }
}

impl NimbleConfig {
    /// Both halves of the credential must be set for it to be sent.
    pub fn has_credentials(&self) -> bool {
        !self.auth_salt.is_empty() && !self.auth_hash.expose_secret().is_empty()
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("NIMBLE_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.nimble.address.is_empty() {
            return Err(ExporterError::Config(
                "nimble.address must not be empty".to_string(),
            ));
        }
        if self.server.listen.is_empty() {
            return Err(ExporterError::Config(
                "server.listen must not be empty".to_string(),
            ));
        }
        if self.metrics.srt_fields.is_empty() {
            return Err(ExporterError::Config(
                "metrics.srt_fields must list at least one field".to_string(),
            ));
        }
        Ok(())
    }
}
