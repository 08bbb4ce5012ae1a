//! Nimble Streamer Prometheus Exporter
//!
//! A Prometheus metrics exporter for the Nimble Streamer management API.
//!
//! # Overview
//!
//! On every scrape the exporter queries three JSON documents from the Nimble
//! management API (SRT sender stats, SRT receiver stats and server status) and
//! re-emits them as plain text metrics, one per line. Nothing is cached between
//! scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     HTTP + JSON      ┌──────────────┐
//! │   Nimble    │ ◄─────────────────►  │   Exporter   │
//! │  Streamer   │  /manage/* (GET)     │              │
//! └─────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                      │  │ Client │  │ ◄────────────► │ Prometheus │
//!                                      │  └────────┘  │       /        └────────────┘
//!                                      │  ┌────────┐  │
//!                                      │  │Translat│  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`nimble`] - HTTP client and API type definitions
//! - [`translator`] - JSON snapshot to metric record translation
//! - [`metrics`] - Metric records and text rendering
//! - [`server`] - HTTP server and scrape handler
//! - [`config`] - Configuration management
//! - [`logging`] - Log subscriber setup
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use nimble_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod nimble;
pub mod server;
pub mod translator;
