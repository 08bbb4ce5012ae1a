//! Server integration tests
//!
//! Tests for the scrape handler and the HTTP endpoint, with wiremock standing in
//! for the Nimble management API.

use nimble_exporter::config::NimbleConfig;
use nimble_exporter::nimble::{
    NimbleClient, SERVER_STATUS_PATH, SRT_RECEIVER_STATS_PATH, SRT_SENDER_STATS_PATH,
};
use nimble_exporter::server::{self, AppState, CollectionStatus};
use nimble_exporter::translator::{SnapshotKind, SrtField, Translator};
use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVER_STATUS: &str = r#"{"Connections":5,"OutRate":100,"SysInfo":{"ap":1,"scl":"none","tpms":10,"fpms":20,"tsss":1,"fsss":2},"RamCacheSize":1,"FileCacheSize":2,"MaxRamCacheSize":10,"MaxFileCacheSize":20}"#;

/// Helper to create state pointing at the mock server
fn create_test_state(address: &str) -> AppState {
    let client = NimbleClient::new(NimbleConfig {
        address: address.to_string(),
        auth_salt: String::new(),
        auth_hash: SecretString::new(String::new().into()),
    })
    .expect("Failed to create client");
    AppState::new(client, Translator::default())
}

fn srt_body(key: &str, ids: &[&str]) -> String {
    let list: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "streamid": format!("live/{}", id),
                "stats": {"time": 1, "link": {"rtt": 1.5}}
            })
        })
        .collect();
    json!({ key: list }).to_string()
}

async fn mount(server: &MockServer, p: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_all_healthy(server: &MockServer) {
    mount(
        server,
        SRT_SENDER_STATS_PATH,
        ResponseTemplate::new(200).set_body_string(srt_body("SrtSenders", &["s1", "s2"])),
    )
    .await;
    mount(
        server,
        SRT_RECEIVER_STATS_PATH,
        ResponseTemplate::new(200).set_body_string(srt_body("SrtReceivers", &["r1"])),
    )
    .await;
    mount(
        server,
        SERVER_STATUS_PATH,
        ResponseTemplate::new(200).set_body_string(SERVER_STATUS),
    )
    .await;
}

#[tokio::test]
async fn test_scrape_emits_blocks_in_source_order() {
    // Given: All three sources healthy
    let upstream = MockServer::start().await;
    mount_all_healthy(&upstream).await;
    let state = create_test_state(&upstream.uri());

    // When: Scraping
    let body = server::scrape(&state).await;

    // Then: 2 senders + 1 receiver + server status, in that order
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 14 * 2 + 14 + 12);
    assert!(lines[..28].iter().all(|l| l.starts_with("nimble_srt_sender_")));
    assert!(lines[28..42]
        .iter()
        .all(|l| l.starts_with("nimble_srt_receiver_")));
    assert_eq!(lines[42], "nimble_connections 5");
    assert!(body.ends_with("nimble_sysinfo_fsss 2\n"));
    assert!(body.contains("nimble_srt_sender_link_rtt { stream_id=\"live/s1\", id=\"s1\"} 1.5\n"));
}

#[tokio::test]
async fn test_scrape_with_sender_timeout_keeps_server_status() {
    // Given: Sender stats too slow, receiver stats failing, server status healthy
    let upstream = MockServer::start().await;
    mount(
        &upstream,
        SRT_SENDER_STATS_PATH,
        ResponseTemplate::new(200)
            .set_body_string(srt_body("SrtSenders", &["s1"]))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    mount(&upstream, SRT_RECEIVER_STATS_PATH, ResponseTemplate::new(500)).await;
    mount(
        &upstream,
        SERVER_STATUS_PATH,
        ResponseTemplate::new(200).set_body_string(SERVER_STATUS),
    )
    .await;
    let state = create_test_state(&upstream.uri());

    // When: Scraping
    let body = server::scrape(&state).await;

    // Then: Only the twelve server status lines remain
    assert_eq!(body.lines().count(), 12);
    assert!(body.starts_with("nimble_connections 5\n"));
    assert!(!body.contains("nimble_srt_"));
}

#[tokio::test]
async fn test_scrape_skips_undecodable_source() {
    let upstream = MockServer::start().await;
    mount(
        &upstream,
        SRT_SENDER_STATS_PATH,
        ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
    )
    .await;
    mount(
        &upstream,
        SRT_RECEIVER_STATS_PATH,
        ResponseTemplate::new(200).set_body_string(srt_body("SrtReceivers", &["r1"])),
    )
    .await;
    mount(
        &upstream,
        SERVER_STATUS_PATH,
        ResponseTemplate::new(200).set_body_string("[1,2,3]"),
    )
    .await;
    let state = create_test_state(&upstream.uri());

    let body = server::scrape(&state).await;

    assert_eq!(body.lines().count(), 14);
    assert!(body.lines().all(|l| l.starts_with("nimble_srt_receiver_")));
}

#[tokio::test]
async fn test_scrape_with_everything_failing_is_empty() {
    let upstream = MockServer::start().await;
    let state = create_test_state(&upstream.uri());

    // No mocks mounted: wiremock answers 404 to everything
    let body = server::scrape(&state).await;

    assert!(body.is_empty());
}

#[tokio::test]
async fn test_collect_source_reports_status() {
    let upstream = MockServer::start().await;
    mount(
        &upstream,
        SERVER_STATUS_PATH,
        ResponseTemplate::new(200).set_body_string(SERVER_STATUS),
    )
    .await;
    let state = create_test_state(&upstream.uri());
    let mut out = String::new();

    let ok = server::collect_source(&state, SnapshotKind::ServerStatus, &mut out).await;
    let failed = server::collect_source(&state, SnapshotKind::SenderStats, &mut out).await;

    assert_eq!(ok, (CollectionStatus::Success, 12));
    assert_eq!(failed, (CollectionStatus::Failed, 0));
    assert_eq!(out.lines().count(), 12);
}

#[tokio::test]
async fn test_scrape_refetches_every_time() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SERVER_STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(SERVER_STATUS))
        .expect(2)
        .mount(&upstream)
        .await;
    let state = create_test_state(&upstream.uri());

    let first = server::scrape(&state).await;
    let second = server::scrape(&state).await;

    assert_eq!(first, second);
    upstream.verify().await;
}

#[tokio::test]
async fn test_scrape_uses_configured_srt_fields() {
    let upstream = MockServer::start().await;
    mount_all_healthy(&upstream).await;
    let client = NimbleClient::new(NimbleConfig {
        address: upstream.uri(),
        auth_salt: String::new(),
        auth_hash: SecretString::new(String::new().into()),
    })
    .expect("Failed to create client");
    let state = AppState::new(client, Translator::new(SrtField::LEGACY.to_vec()));

    let body = server::scrape(&state).await;

    assert_eq!(body.lines().count(), 16 * 2 + 16 + 12);
}

#[tokio::test]
async fn test_metrics_endpoint_over_http() {
    // Given: The router served on an ephemeral port, upstream partially down
    let upstream = MockServer::start().await;
    mount(
        &upstream,
        SERVER_STATUS_PATH,
        ResponseTemplate::new(200).set_body_string(SERVER_STATUS),
    )
    .await;
    let app = server::router(create_test_state(&upstream.uri()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // When: Prometheus scrapes `/`
    let response = reqwest::get(format!("http://{}/", addr))
        .await
        .expect("Request failed");

    // Then: 200, plain text, server status lines only
    assert_eq!(response.status().as_u16(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{}", content_type);
    let body = response.text().await.unwrap();
    assert_eq!(body.lines().count(), 12);
    assert!(body.contains("nimble_sysinfo_scl none\n"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let upstream = MockServer::start().await;
    let app = server::router(create_test_state(&upstream.uri()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let response = reqwest::get(format!("http://{}/health", addr))
        .await
        .expect("Request failed");

    assert_eq!(response.status().as_u16(), 404);
}
