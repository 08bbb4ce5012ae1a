use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Cannot connect to Nimble for {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Nimble returned HTTP {status} for {path}")]
    Status { path: String, status: StatusCode },

    #[error("Cannot decode JSON from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExporterError {
    /// True for failures talking to the upstream (connection or status).
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Status { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
