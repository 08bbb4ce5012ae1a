//! Nimble Management API Type Definitions
//!
//! Rust structs for the JSON documents returned by the Nimble Streamer
//! management API.
//!
//! # Design Notes
//!
//! - **Lenient leaves**: every scalar field goes through a [`lenient`] helper, so an
//!   absent, `null` or mistyped value becomes `0`, `0.0` or `""` instead of failing
//!   the whole document.
//! - **Lenient blocks**: nested objects (`SysInfo`, `stats`, `window`, ...) that are
//!   missing or not objects decode to their all-zero default.
//! - **Completeness**: fields the exporter does not emit by default (`state`,
//!   `bytesReceived`, ...) are still decoded so they can be enabled per field.
//!
//! # API Endpoints Covered
//!
//! - `/manage/server_status` → [`ServerStatus`], [`SysInfo`]
//! - `/manage/srt_sender_stats` → `{"SrtSenders": [`[`SrtConnection`]`]}`
//! - `/manage/srt_receiver_stats` → `{"SrtReceivers": [`[`SrtConnection`]`]}`

use serde::Deserialize;

/// Server status from `/manage/server_status`
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ServerStatus {
    #[serde(rename = "Connections", default, deserialize_with = "lenient::int")]
    pub connections: i64,
    #[serde(rename = "OutRate", default, deserialize_with = "lenient::int")]
    pub out_rate: i64,
    #[serde(rename = "SysInfo", default, deserialize_with = "lenient::block")]
    pub sys_info: SysInfo,
    #[serde(rename = "RamCacheSize", default, deserialize_with = "lenient::int")]
    pub ram_cache_size: i64,
    #[serde(rename = "FileCacheSize", default, deserialize_with = "lenient::int")]
    pub file_cache_size: i64,
    #[serde(rename = "MaxRamCacheSize", default, deserialize_with = "lenient::int")]
    pub max_ram_cache_size: i64,
    #[serde(rename = "MaxFileCacheSize", default, deserialize_with = "lenient::int")]
    pub max_file_cache_size: i64,
}

/// `SysInfo` block of the server status
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SysInfo {
    /// Access point count
    #[serde(default, deserialize_with = "lenient::int")]
    pub ap: i64,
    /// Scaling mode
    #[serde(default, deserialize_with = "lenient::string")]
    pub scl: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub tpms: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub fpms: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub tsss: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub fsss: i64,
}

/// One SRT sender or receiver connection
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SrtConnection {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(rename = "streamid", default, deserialize_with = "lenient::string")]
    pub stream_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::block")]
    pub stats: SrtStats,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SrtStats {
    #[serde(default, deserialize_with = "lenient::int")]
    pub time: i64,
    #[serde(default, deserialize_with = "lenient::block")]
    pub window: SrtWindow,
    #[serde(default, deserialize_with = "lenient::block")]
    pub link: SrtLink,
    #[serde(default, deserialize_with = "lenient::block")]
    pub recv: SrtRecv,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SrtWindow {
    #[serde(default, deserialize_with = "lenient::int")]
    pub flow: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub congestion: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub flight: i64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SrtLink {
    #[serde(default, deserialize_with = "lenient::float")]
    pub rtt: f64,
    #[serde(rename = "mbpsBandwidth", default, deserialize_with = "lenient::float")]
    pub mbps_bandwidth: f64,
    #[serde(rename = "mbpsMaxBandwidth", default, deserialize_with = "lenient::int")]
    pub mbps_max_bandwidth: i64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SrtRecv {
    #[serde(rename = "packetsReceived", default, deserialize_with = "lenient::int")]
    pub packets_received: i64,
    #[serde(
        rename = "packetsReceivedRetransmitted",
        default,
        deserialize_with = "lenient::int"
    )]
    pub packets_received_retransmitted: i64,
    #[serde(rename = "packetsLost", default, deserialize_with = "lenient::int")]
    pub packets_lost: i64,
    #[serde(rename = "packetsDropped", default, deserialize_with = "lenient::int")]
    pub packets_dropped: i64,
    #[serde(rename = "packetsBelated", default, deserialize_with = "lenient::int")]
    pub packets_belated: i64,
    /// `NAKsSent` as written by current Nimble builds; read through [`SrtRecv::naks`]
    #[serde(rename = "NAKsSent", default, deserialize_with = "lenient::int")]
    pub naks_sent: i64,
    /// Fallback spelling, decoded on its own so both keys may appear together
    #[serde(rename = "naksSent", default, deserialize_with = "lenient::int")]
    pub naks_sent_camel: i64,
    #[serde(rename = "bytesReceived", default, deserialize_with = "lenient::int")]
    pub bytes_received: i64,
    #[serde(rename = "bytesLost", default, deserialize_with = "lenient::int")]
    pub bytes_lost: i64,
    #[serde(rename = "bytesDropped", default, deserialize_with = "lenient::int")]
    pub bytes_dropped: i64,
    #[serde(rename = "mbpsRate", default, deserialize_with = "lenient::float")]
    pub mbps_rate: f64,
}

impl SrtRecv {
    /// NAKs sent, preferring `NAKsSent` and falling back to `naksSent`.
    pub fn naks(&self) -> i64 {
        if self.naks_sent != 0 {
            self.naks_sent
        } else {
            self.naks_sent_camel
        }
    }
}

impl ServerStatus {
    /// Decode a status object leniently; non-objects give an all-zero status.
    pub fn from_value(value: serde_json::Value) -> Self {
        lenient::block_from_value(value)
    }
}

impl SrtConnection {
    /// Decode one list element; anything that is not an object is an all-zero record.
    pub fn from_value(value: serde_json::Value) -> Self {
        lenient::block_from_value(value)
    }
}

/// `deserialize_with` helpers mapping absent or mistyped values to zero values
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    /// Integer leaf. Floats are truncated toward zero; everything else is `0`.
    pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
                .or_else(|| n.as_f64().map(|v| v as i64))
                .unwrap_or(0),
            _ => 0,
        })
    }

    /// Float leaf. Non-numbers are `0.0`.
    pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_f64().unwrap_or(0.0))
    }

    /// String leaf. Non-strings are empty.
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    /// Nested object. Anything that is not an object is `T::default()`.
    pub fn block<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(block_from_value(value))
    }

    pub(crate) fn block_from_value<T>(value: Value) -> T
    where
        T: DeserializeOwned + Default,
    {
        match value {
            obj @ Value::Object(_) => serde_json::from_value(obj).unwrap_or_else(|e| {
                warn!(
                    "Cannot decode {} block, using zero values: {}",
                    std::any::type_name::<T>(),
                    e
                );
                T::default()
            }),
            _ => T::default(),
        }
    }
}
