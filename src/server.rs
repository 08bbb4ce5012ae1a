//! HTTP Server and Scrape Handler
//!
//! This module implements the exporter's HTTP surface and the per-request scrape.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing a single `/` endpoint
//! - **Scrape**: every request fetches all three Nimble documents, translates them
//!   and writes the lines straight into the response; nothing is cached
//! - **State Management**: client and translator are immutable and shared through `Arc`
//!
//! # Endpoints
//!
//! - `GET /` - Metrics in plain text, one per line
//!
//! # Scrape Order
//!
//! Sources are fetched one after another, never in parallel:
//! 1. `/manage/srt_sender_stats`
//! 2. `/manage/srt_receiver_stats`
//! 3. `/manage/server_status`
//!
//! # Error Handling
//!
//! A fetch or decode failure drops that source's block and is logged at error
//! level. The response is still `200 OK` with whatever the other sources produced,
//! even when every source fails.

use crate::config::Config;
use crate::error::ExporterError;
use crate::metrics::MetricRecord;
use crate::nimble::NimbleClient;
use crate::translator::{SnapshotKind, Translator};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Content type of the metrics response
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Shared, read-only state of the exporter
#[derive(Clone)]
pub struct AppState {
    client: Arc<NimbleClient>,
    translator: Arc<Translator>,
}

impl AppState {
    pub fn new(client: NimbleClient, translator: Translator) -> Self {
        Self {
            client: Arc::new(client),
            translator: Arc::new(translator),
        }
    }

    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let client = NimbleClient::new(config.nimble.clone())?;
        let translator = Translator::new(config.metrics.srt_fields.clone());
        Ok(Self::new(client, translator))
    }
}

/// Status of a single source within a scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Records were produced and written
    Success,
    /// Fetch or decode failed, block omitted (already logged)
    Failed,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Scraping Nimble at {}", config.nimble.address);

    axum::serve(listener, app).await.map_err(ExporterError::Io)?;

    Ok(())
}

/// Build the router; exposed separately so tests can serve it on an ephemeral port.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(metrics_handler))
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = scrape(&state).await;
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

/// Run one full scrape and return the response body.
pub async fn scrape(state: &AppState) -> String {
    let mut body = String::new();
    let mut succeeded = 0usize;
    let mut lines = 0usize;

    for kind in SnapshotKind::ALL {
        if let (CollectionStatus::Success, count) = collect_source(state, kind, &mut body).await {
            succeeded += 1;
            lines += count;
        }
    }

    debug!(
        "Scrape finished: {}/{} sources, {} lines",
        succeeded,
        SnapshotKind::ALL.len(),
        lines
    );
    body
}

/// Fetch and translate one source, appending its lines to `out`.
///
/// Returns the status and the number of lines written.
pub async fn collect_source(
    state: &AppState,
    kind: SnapshotKind,
    out: &mut String,
) -> (CollectionStatus, usize) {
    let records = match fetch_and_translate(state, kind).await {
        Ok(records) => records,
        Err(e) if e.is_fetch() => {
            // The client has already logged the failure
            return (CollectionStatus::Failed, 0);
        }
        Err(e) => {
            error!("Skipping {} metrics: {}", kind.name(), e);
            return (CollectionStatus::Failed, 0);
        }
    };

    for record in &records {
        record.write_line(out);
    }
    debug!("Collected {} {} metrics", records.len(), kind.name());
    (CollectionStatus::Success, records.len())
}

async fn fetch_and_translate(
    state: &AppState,
    kind: SnapshotKind,
) -> crate::error::Result<Vec<MetricRecord>> {
    let body = state.client.fetch(kind.path()).await?;
    state.translator.translate(kind, &body)
}
