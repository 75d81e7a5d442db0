//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → HTTP requests → Singer JSON lines

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use tap_intercom::config::{StartDate, TapConfig};
use tap_intercom::http::{HttpClient, HttpClientConfig};
use tap_intercom::output::{JsonLinesWriter, Message, MessageCollector};
use tap_intercom::request::FilterPredicate;
use tap_intercom::state::StateManager;
use tap_intercom::tap::{Connector, IntercomTap, ReadOptions};
use tap_intercom::types::BackoffType;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> TapConfig {
    let mut config = TapConfig::new("test-token").with_api_url(server.uri());
    config.max_retries = 0;
    config.requests_per_second = 1000;
    config
}

async fn read(
    config: &TapConfig,
    state: StateManager,
    streams: &[&str],
) -> (tap_intercom::engine::SyncReport, MessageCollector) {
    let options = ReadOptions::default().with_streams(streams.iter().copied());
    let mut out = MessageCollector::new();
    let report = IntercomTap::new()
        .read(config, state, &options, &mut out)
        .await
        .unwrap();
    (report, out)
}

// ============================================================================
// HTTP Client Integration Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_sends_intercom_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Intercom-Version", "2.11"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"admins": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::from_tap_config(&config(&mock_server)).unwrap();
    let body = client.get_json("/admins").await.unwrap();
    assert_eq!(body, json!({"admins": []}));
}

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First request fails, second succeeds
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .bearer("t")
        .max_retries(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(100),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let body = client.get_json("/tags").await.unwrap();
    assert_eq!(body["ok"], true);
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_search_stops_without_next_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/conversations/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "conversation.list",
            "conversations": [{"id": "1", "updated_at": 10}],
            "pages": {"type": "pages", "page": 1, "total_pages": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (report, out) = read(&config(&mock_server), StateManager::in_memory(), &["conversations"]).await;
    assert!(report.is_success());
    assert_eq!(out.records("conversations").len(), 1);
    assert_eq!(report.stats.pages_fetched(), 1);
}

#[tokio::test]
async fn test_search_follows_starting_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contacts/search"))
        .and(body_partial_json(json!({"pagination": {"starting_after": "abc123"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c2", "updated_at": 20}],
            "pages": {"next": null}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c1", "updated_at": 10}],
            "pages": {"next": {"starting_after": "abc123"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (report, out) = read(&config(&mock_server), StateManager::in_memory(), &["contacts"]).await;
    assert!(report.is_success());
    let ids: Vec<&Value> = out.records("contacts").iter().map(|r| &r["id"]).collect();
    assert_eq!(ids, vec![&json!("c1"), &json!("c2")]);
}

#[tokio::test]
async fn test_articles_follow_next_link() {
    let mock_server = MockServer::start().await;
    let next = format!("{}/articles?page=2&per_page=150", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "list",
            "data": [{"id": "a2", "title": "Two"}],
            "pages": {"type": "pages", "page": 2, "next": null}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "list",
            "data": [{"id": "a1", "title": "One"}],
            "pages": {"type": "pages", "page": 1, "next": next}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (report, out) = read(&config(&mock_server), StateManager::in_memory(), &["articles"]).await;
    assert!(report.is_success());
    assert_eq!(out.records("articles").len(), 2);
}

// ============================================================================
// Incremental sync
// ============================================================================

#[tokio::test]
async fn test_start_date_becomes_strict_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/conversations/search"))
        .and(body_json(json!({
            "sort": {"field": "updated_at", "order": "ascending"},
            "query": {"field": "updated_at", "operator": ">", "value": 1_672_531_200}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"conversations": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config(&mock_server).with_start_date(StartDate::DateTime("2023-01-01T00:00:00Z".into()));
    let (report, _) = read(&config, StateManager::in_memory(), &["conversations"]).await;
    assert!(report.is_success());
}

#[tokio::test]
async fn test_filters_and_bookmark_are_combined() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/conversations/search"))
        .and(body_json(json!({
            "sort": {"field": "updated_at", "order": "ascending"},
            "query": {"operator": "AND", "value": [
                {"field": "state", "operator": "=", "value": "open"},
                {"field": "updated_at", "operator": ">", "value": 1_700_000_000}
            ]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversations": [{"id": "9", "updated_at": 1_700_000_100}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = StateManager::from_json(
        r#"{"bookmarks": {"conversations": {"replication_key": "updated_at", "replication_key_value": 1700000000}}}"#,
    )
    .unwrap();
    let config = config(&mock_server).with_filters(
        "conversations",
        vec![FilterPredicate::new("state", "=", "open")],
    );
    let (report, out) = read(&config, state, &["conversations"]).await;

    assert!(report.is_success());
    let last_state = out.states().last().copied().cloned().unwrap();
    assert_eq!(
        last_state["bookmarks"]["conversations"]["replication_key_value"],
        json!(1_700_000_100)
    );
}

#[tokio::test]
async fn test_state_file_resumes_next_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contacts/search"))
        .and(body_partial_json(json!({
            "query": {"field": "updated_at", "operator": ">", "value": 500}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1", "updated_at": 300}, {"id": "2", "updated_at": 500}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let config = config(&mock_server);

    let (_, first) = read(&config, StateManager::from_file(&state_path).unwrap(), &["contacts"]).await;
    assert_eq!(first.records("contacts").len(), 2);

    let (_, second) = read(&config, StateManager::from_file(&state_path).unwrap(), &["contacts"]).await;
    assert!(second.records("contacts").is_empty());
}

// ============================================================================
// Parent/child streams
// ============================================================================

async fn mount_conversation_with_parts(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/conversations/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversations": [{"id": "42", "updated_at": 100}]
        })))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversations/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "conversation",
            "id": "42",
            "conversation_parts": {
                "type": "conversation_part.list",
                "conversation_parts": [
                    {"id": "p1", "part_type": "comment", "body": "<p>Hello</p>", "updated_at": 110},
                    {"id": "p2", "part_type": "assignment", "body": null, "updated_at": 120}
                ],
                "total_count": 2
            }
        })))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_conversation_parts_carry_conversation_id() {
    let mock_server = MockServer::start().await;
    mount_conversation_with_parts(&mock_server).await;

    let (report, out) = read(
        &config(&mock_server),
        StateManager::in_memory(),
        &["conversations", "conversation_parts"],
    )
    .await;

    assert!(report.is_success());
    let parts = out.records("conversation_parts");
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(|p| p["conversation_id"] == json!("42")));
    assert_eq!(parts[0]["conversation_part_has_body"], json!(true));
    assert_eq!(parts[1]["conversation_part_has_body"], json!(false));
}

#[tokio::test]
async fn test_child_only_selection_hides_parent() {
    let mock_server = MockServer::start().await;
    mount_conversation_with_parts(&mock_server).await;

    let (report, out) = read(&config(&mock_server), StateManager::in_memory(), &["conversation_parts"]).await;

    assert!(report.is_success());
    assert_eq!(out.schemas(), vec!["conversation_parts"]);
    assert!(out.records("conversations").is_empty());
    assert_eq!(out.records("conversation_parts").len(), 2);
}

// ============================================================================
// Output
// ============================================================================

#[tokio::test]
async fn test_json_lines_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "team.list",
            "teams": [{"id": "7", "name": "Billing", "admin_ids": [1, 2]}]
        })))
        .mount(&mock_server)
        .await;

    let mut writer = JsonLinesWriter::new(Vec::new(), false);
    let options = ReadOptions::default().with_streams(["teams"]);
    IntercomTap::new()
        .read(&config(&mock_server), StateManager::in_memory(), &options, &mut writer)
        .await
        .unwrap();

    let output = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let types: Vec<&str> = lines.iter().map(|l| l["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["SCHEMA", "RECORD", "STATE"]);
    assert_eq!(lines[0]["stream"], json!("teams"));
    assert_eq!(lines[0]["key_properties"], json!(["id"]));
    assert_eq!(lines[1]["record"]["name"], json!("Billing"));
    assert!(lines[1]["time_extracted"].is_string());
}

#[tokio::test]
async fn test_http_error_reports_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let (report, out) = read(&config(&mock_server), StateManager::in_memory(), &["admins"]).await;

    assert!(!report.is_success());
    assert_eq!(report.results[0].error.as_deref(), Some("HTTP 404: Not found"));
    // STATE still closes the failed tree
    assert!(matches!(out.messages.last(), Some(Message::State { .. })));
}
