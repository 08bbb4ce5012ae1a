//! Server Status Translator
//!
//! Translates `/manage/server_status` into twelve unlabeled records.
//!
//! # Metrics Produced
//! - `nimble_connections` - Current connection count
//! - `nimble_outrate` - Outgoing bandwidth
//! - `nimble_ram_cache_size` / `nimble_ram_cache_size_max` - RAM cache usage and limit
//! - `nimble_file_cache_size` / `nimble_file_cache_size_max` - File cache usage and limit
//! - `nimble_sysinfo_ap` - Access point count
//! - `nimble_sysinfo_scl` - Scaling mode, rendered as a bare token
//! - `nimble_sysinfo_tpms`, `nimble_sysinfo_fpms` - Millisecond timers
//! - `nimble_sysinfo_tsss`, `nimble_sysinfo_fsss` - Second counters

use super::parse_object;
use crate::error::Result;
use crate::metrics::MetricRecord;
use crate::nimble::types::ServerStatus;
use crate::nimble::SERVER_STATUS_PATH;
use serde_json::Value;

/// Decode a server status body and emit its twelve records.
///
/// # Errors
///
/// [`crate::error::ExporterError::Decode`] if the body is not JSON or not an object.
pub fn translate_server_status(body: &str) -> Result<Vec<MetricRecord>> {
    let map = parse_object(SERVER_STATUS_PATH, body)?;
    let status = ServerStatus::from_value(Value::Object(map));
    Ok(server_status_records(&status))
}

/// Records for an already decoded status, in output order
pub fn server_status_records(status: &ServerStatus) -> Vec<MetricRecord> {
    let sys = &status.sys_info;
    vec![
        MetricRecord::new("nimble_connections", status.connections),
        MetricRecord::new("nimble_outrate", status.out_rate),
        MetricRecord::new("nimble_ram_cache_size", status.ram_cache_size),
        MetricRecord::new("nimble_file_cache_size", status.file_cache_size),
        MetricRecord::new("nimble_ram_cache_size_max", status.max_ram_cache_size),
        MetricRecord::new("nimble_file_cache_size_max", status.max_file_cache_size),
        MetricRecord::new("nimble_sysinfo_ap", sys.ap),
        MetricRecord::new("nimble_sysinfo_scl", sys.scl.clone()),
        MetricRecord::new("nimble_sysinfo_tpms", sys.tpms),
        MetricRecord::new("nimble_sysinfo_fpms", sys.fpms),
        MetricRecord::new("nimble_sysinfo_tsss", sys.tsss),
        MetricRecord::new("nimble_sysinfo_fsss", sys.fsss),
    ]
}
