pub mod client;
pub mod types;

pub use client::{NimbleClient, UPSTREAM_TIMEOUT};

/// SRT sender statistics
pub const SRT_SENDER_STATS_PATH: &str = "/manage/srt_sender_stats";
/// SRT receiver statistics
pub const SRT_RECEIVER_STATS_PATH: &str = "/manage/srt_receiver_stats";
/// Connection count, cache sizes and system info
pub const SERVER_STATUS_PATH: &str = "/manage/server_status";
