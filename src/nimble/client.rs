//! Nimble Management API Client
//!
//! Thin HTTP client for the Nimble Streamer management API. Every call is a
//! single GET with a fixed timeout; there is no retry and no caching.
//!
//! # Authentication
//!
//! When both `auth_salt` and `auth_hash` are configured the request URL gets
//! `?salt=<salt>&hash=<hash>` appended. Generating the pair is up to the
//! operator. The credential never appears in logs or error messages.
//!
//! # Example
//!
//! ```no_run
//! use nimble_exporter::config::NimbleConfig;
//! use nimble_exporter::nimble::{NimbleClient, SERVER_STATUS_PATH};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = NimbleClient::new(NimbleConfig::default())?;
//! let body = client.fetch(SERVER_STATUS_PATH).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::NimbleConfig;
use crate::error::{ExporterError, Result};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, error};

/// Timeout applied to every request against the management API
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the Nimble management API
///
/// Holds one `reqwest::Client` for the life of the process. The client is
/// `Send + Sync` and is shared between concurrent scrapes behind an `Arc`.
pub struct NimbleClient {
    http: reqwest::Client,
    config: NimbleConfig,
}

impl NimbleClient {
    pub fn new(config: NimbleConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| ExporterError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Build the full request URL for `path`, with the credential when configured.
    pub fn request_url(&self, path: &str) -> String {
        let mut url = format!("{}{}", self.config.address, path);
        if self.config.has_credentials() {
            url.push_str("?salt=");
            url.push_str(&self.config.auth_salt);
            url.push_str("&hash=");
            url.push_str(self.config.auth_hash.expose_secret());
        }
        url
    }

    /// GET `path` and return the body of a 200 response.
    ///
    /// # Errors
    ///
    /// - [`ExporterError::Connection`] if the server is unreachable, the request
    ///   times out or the body cannot be read
    /// - [`ExporterError::Status`] for any status other than 200
    pub async fn fetch(&self, path: &str) -> Result<String> {
        debug!("Connecting to {}", self.config.address);

        let response = match self.http.get(self.request_url(path)).send().await {
            Ok(response) => response,
            Err(e) => {
                // The URL may carry the credential
                let e = e.without_url();
                error!("Cannot connect to {}: {}", self.config.address, e);
                return Err(ExporterError::Connection {
                    path: path.to_string(),
                    source: e,
                });
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            error!("Got {} response code from {}", status.as_u16(), path);
            return Err(ExporterError::Status {
                path: path.to_string(),
                status,
            });
        }

        response.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read response body from {}: {}", path, e);
            ExporterError::Connection {
                path: path.to_string(),
                source: e,
            }
        })
    }
}
