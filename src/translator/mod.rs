//! Snapshot Translators
//!
//! This module turns raw JSON bodies from the Nimble management API into ordered
//! [`MetricRecord`]s. Each snapshot kind has one translation function; SRT senders
//! and receivers share a single routine keyed by [`Role`].
//!
//! # Architecture
//!
//! Translators follow a consistent pattern:
//! - Parse the body and check that the top level is a JSON object
//! - Decode leniently into the types in [`crate::nimble::types`]
//! - Emit records in a fixed order, elements in source list order
//!
//! # Error Handling
//!
//! A translator either returns every record for the snapshot or an
//! [`ExporterError::Decode`] and no records. Missing or mistyped leaf fields are not
//! errors; they decode to zero values.

use crate::error::{ExporterError, Result};
use crate::metrics::MetricRecord;
use crate::nimble::{SERVER_STATUS_PATH, SRT_RECEIVER_STATS_PATH, SRT_SENDER_STATS_PATH};
use serde_json::{Map, Value};

pub mod server_status;
pub mod srt;

pub use server_status::translate_server_status;
pub use srt::{translate_srt, SrtField};

/// Which side of an SRT connection a statistics list describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Sender,
    Receiver,
}

impl Role {
    /// Metric name prefix, without the trailing underscore
    pub fn prefix(self) -> &'static str {
        match self {
            Role::Sender => "nimble_srt_sender",
            Role::Receiver => "nimble_srt_receiver",
        }
    }

    /// Key of the connection list in the response object
    pub fn list_key(self) -> &'static str {
        match self {
            Role::Sender => "SrtSenders",
            Role::Receiver => "SrtReceivers",
        }
    }

    /// Snapshot carrying this role's connection list
    pub fn kind(self) -> SnapshotKind {
        match self {
            Role::Sender => SnapshotKind::SenderStats,
            Role::Receiver => SnapshotKind::ReceiverStats,
        }
    }
}

/// The three upstream documents scraped on every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    SenderStats,
    ReceiverStats,
    ServerStatus,
}

impl SnapshotKind {
    /// Scrape order
    pub const ALL: [SnapshotKind; 3] = [
        SnapshotKind::SenderStats,
        SnapshotKind::ReceiverStats,
        SnapshotKind::ServerStatus,
    ];

    pub fn path(self) -> &'static str {
        match self {
            SnapshotKind::SenderStats => SRT_SENDER_STATS_PATH,
            SnapshotKind::ReceiverStats => SRT_RECEIVER_STATS_PATH,
            SnapshotKind::ServerStatus => SERVER_STATUS_PATH,
        }
    }

    /// Short name used in log lines
    pub fn name(self) -> &'static str {
        match self {
            SnapshotKind::SenderStats => "sender_stats",
            SnapshotKind::ReceiverStats => "receiver_stats",
            SnapshotKind::ServerStatus => "server_status",
        }
    }

    pub fn role(self) -> Option<Role> {
        match self {
            SnapshotKind::SenderStats => Some(Role::Sender),
            SnapshotKind::ReceiverStats => Some(Role::Receiver),
            SnapshotKind::ServerStatus => None,
        }
    }
}

/// Translates snapshots with a fixed SRT field selection
///
/// Built once at startup from [`crate::config::MetricsConfig`] and shared
/// read-only between scrapes.
#[derive(Debug, Clone)]
pub struct Translator {
    srt_fields: Vec<SrtField>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(SrtField::DEFAULT.to_vec())
    }
}

impl Translator {
    pub fn new(srt_fields: Vec<SrtField>) -> Self {
        Self { srt_fields }
    }

    /// Translate `body` as a snapshot of `kind`.
    pub fn translate(&self, kind: SnapshotKind, body: &str) -> Result<Vec<MetricRecord>> {
        match kind.role() {
            Some(role) => translate_srt(role, body, &self.srt_fields),
            None => translate_server_status(body),
        }
    }
}

/// Parse `body` and require a JSON object at the top level.
pub(crate) fn parse_object(path: &str, body: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(body).map_err(|e| ExporterError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExporterError::Decode {
            path: path.to_string(),
            reason: format!("expected a JSON object, got {}", json_type_name(&other)),
        }),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
