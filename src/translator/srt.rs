//! SRT Sender/Receiver Translator
//!
//! Translates `/manage/srt_sender_stats` and `/manage/srt_receiver_stats`. Both
//! documents carry the same connection shape under a different list key, so one
//! routine serves both, parameterized by [`Role`].
//!
//! # Metrics Produced
//!
//! Per connection, one record per selected [`SrtField`], named
//! `nimble_srt_{sender,receiver}_<field>` and labeled with `stream_id` then `id`.
//! The default selection ([`SrtField::DEFAULT`]) has fourteen fields:
//!
//! - `time`
//! - `window_flow`, `window_congestion`, `window_flight`
//! - `link_rtt`, `link_bandwidth` (floats), `link_bandwidth_max`
//! - `recv_packets_received`, `recv_packets_received_retransmitted`,
//!   `recv_packets_lost`, `recv_packets_dropped`, `recv_packets_belated`,
//!   `recv_naks_sent`
//! - `recv_mbps_rate` (float)
//!
//! `recv_bytes_received`, `recv_bytes_lost` and `recv_bytes_dropped` are opt-in.

use super::{json_type_name, parse_object, Role};
use crate::error::{ExporterError, Result};
use crate::metrics::{Labels, MetricRecord, MetricValue};
use crate::nimble::types::{SrtConnection, SrtStats};
use serde::Deserialize;
use serde_json::Value;

/// A statistic that can be emitted for each SRT connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SrtField {
    Time,
    WindowFlow,
    WindowCongestion,
    WindowFlight,
    LinkRtt,
    LinkBandwidth,
    LinkBandwidthMax,
    RecvPacketsReceived,
    RecvPacketsReceivedRetransmitted,
    RecvPacketsLost,
    RecvPacketsDropped,
    RecvPacketsBelated,
    RecvNaksSent,
    RecvBytesReceived,
    RecvBytesLost,
    RecvBytesDropped,
    RecvMbpsRate,
}

impl SrtField {
    /// Fields emitted unless configured otherwise
    pub const DEFAULT: [SrtField; 14] = [
        SrtField::Time,
        SrtField::WindowFlow,
        SrtField::WindowCongestion,
        SrtField::WindowFlight,
        SrtField::LinkRtt,
        SrtField::LinkBandwidth,
        SrtField::LinkBandwidthMax,
        SrtField::RecvPacketsReceived,
        SrtField::RecvPacketsReceivedRetransmitted,
        SrtField::RecvPacketsLost,
        SrtField::RecvPacketsDropped,
        SrtField::RecvPacketsBelated,
        SrtField::RecvNaksSent,
        SrtField::RecvMbpsRate,
    ];

    /// Layout of earlier exporter releases, with the byte loss counters
    pub const LEGACY: [SrtField; 16] = [
        SrtField::Time,
        SrtField::WindowFlow,
        SrtField::WindowCongestion,
        SrtField::WindowFlight,
        SrtField::LinkRtt,
        SrtField::LinkBandwidth,
        SrtField::LinkBandwidthMax,
        SrtField::RecvPacketsReceived,
        SrtField::RecvPacketsReceivedRetransmitted,
        SrtField::RecvPacketsLost,
        SrtField::RecvPacketsDropped,
        SrtField::RecvPacketsBelated,
        SrtField::RecvNaksSent,
        SrtField::RecvBytesLost,
        SrtField::RecvBytesDropped,
        SrtField::RecvMbpsRate,
    ];

    /// Metric name suffix after the role prefix
    pub fn suffix(self) -> &'static str {
        match self {
            SrtField::Time => "time",
            SrtField::WindowFlow => "window_flow",
            SrtField::WindowCongestion => "window_congestion",
            SrtField::WindowFlight => "window_flight",
            SrtField::LinkRtt => "link_rtt",
            SrtField::LinkBandwidth => "link_bandwidth",
            SrtField::LinkBandwidthMax => "link_bandwidth_max",
            SrtField::RecvPacketsReceived => "recv_packets_received",
            SrtField::RecvPacketsReceivedRetransmitted => "recv_packets_received_retransmitted",
            SrtField::RecvPacketsLost => "recv_packets_lost",
            SrtField::RecvPacketsDropped => "recv_packets_dropped",
            SrtField::RecvPacketsBelated => "recv_packets_belated",
            SrtField::RecvNaksSent => "recv_naks_sent",
            SrtField::RecvBytesReceived => "recv_bytes_received",
            SrtField::RecvBytesLost => "recv_bytes_lost",
            SrtField::RecvBytesDropped => "recv_bytes_dropped",
            SrtField::RecvMbpsRate => "recv_mbps_rate",
        }
    }

    pub fn value(self, stats: &SrtStats) -> MetricValue {
        match self {
            SrtField::Time => stats.time.into(),
            SrtField::WindowFlow => stats.window.flow.into(),
            SrtField::WindowCongestion => stats.window.congestion.into(),
            SrtField::WindowFlight => stats.window.flight.into(),
            SrtField::LinkRtt => stats.link.rtt.into(),
            SrtField::LinkBandwidth => stats.link.mbps_bandwidth.into(),
            SrtField::LinkBandwidthMax => stats.link.mbps_max_bandwidth.into(),
            SrtField::RecvPacketsReceived => stats.recv.packets_received.into(),
            SrtField::RecvPacketsReceivedRetransmitted => {
                stats.recv.packets_received_retransmitted.into()
            }
            SrtField::RecvPacketsLost => stats.recv.packets_lost.into(),
            SrtField::RecvPacketsDropped => stats.recv.packets_dropped.into(),
            SrtField::RecvPacketsBelated => stats.recv.packets_belated.into(),
            SrtField::RecvNaksSent => stats.recv.naks().into(),
            SrtField::RecvBytesReceived => stats.recv.bytes_received.into(),
            SrtField::RecvBytesLost => stats.recv.bytes_lost.into(),
            SrtField::RecvBytesDropped => stats.recv.bytes_dropped.into(),
            SrtField::RecvMbpsRate => stats.recv.mbps_rate.into(),
        }
    }
}

/// Decode a sender or receiver statistics body and emit `fields.len()` records per
/// connection.
///
/// A missing or `null` connection list is an empty list.
///
/// # Errors
///
/// [`ExporterError::Decode`] if the body is not JSON, the top level is not an
/// object, or the list key holds something other than an array.
pub fn translate_srt(role: Role, body: &str, fields: &[SrtField]) -> Result<Vec<MetricRecord>> {
    let path = role.kind().path();
    let mut map = parse_object(path, body)?;

    let items = match map.remove(role.list_key()) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ExporterError::Decode {
                path: path.to_string(),
                reason: format!(
                    "expected {} to be an array, got {}",
                    role.list_key(),
                    json_type_name(&other)
                ),
            })
        }
    };

    let connections: Vec<SrtConnection> =
        items.into_iter().map(SrtConnection::from_value).collect();
    Ok(srt_records(role, &connections, fields))
}

/// Records for already decoded connections, grouped per connection in list order
pub fn srt_records(
    role: Role,
    connections: &[SrtConnection],
    fields: &[SrtField],
) -> Vec<MetricRecord> {
    let prefix = role.prefix();
    let mut records = Vec::with_capacity(connections.len() * fields.len());

    for conn in connections {
        let labels = Labels::new()
            .with("stream_id", conn.stream_id.as_str())
            .with("id", conn.id.as_str());

        for field in fields {
            records.push(
                MetricRecord::new(format!("{}_{}", prefix, field.suffix()), field.value(&conn.stats))
                    .with_labels(labels.clone()),
            );
        }
    }

    records
}
