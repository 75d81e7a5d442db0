//! Tests for output messages

use super::*;
use crate::partition::SyncContext;
use crate::schema::{conform_record, Field, Schema};
use crate::state::{BookmarkKind, BookmarkValue, StateManager};
use crate::streams::StreamRegistry;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn lines(bytes: Vec<u8>) -> Vec<Value> {
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_schema_message() {
    let stream = StreamRegistry::global().get("conversations").unwrap();
    let value = serde_json::to_value(Message::schema(stream)).unwrap();

    assert_eq!(value["type"], "SCHEMA");
    assert_eq!(value["stream"], "conversations");
    assert_eq!(value["key_properties"], json!(["id"]));
    assert_eq!(value["bookmark_properties"], json!(["updated_at"]));
    assert_eq!(value["schema"]["type"], "object");
}

#[test]
fn test_schema_message_without_bookmark() {
    let stream = StreamRegistry::global().get("tags").unwrap();
    let value = serde_json::to_value(Message::schema(stream)).unwrap();
    assert!(value.get("bookmark_properties").is_none());
}

#[test]
fn test_record_message() {
    let schema = Schema::new(vec![Field::string("id"), Field::integer("updated_at")]);
    let record = conform_record(
        "tags",
        &schema,
        &["id".to_string()],
        json!({"id": "1", "updated_at": 5}).as_object().cloned().unwrap(),
    )
    .unwrap();

    let message = Message::record("tags", &record);
    assert_eq!(message.stream(), Some("tags"));

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["type"], "RECORD");
    assert_eq!(value["record"], json!({"id": "1", "updated_at": 5}));
    assert!(value["time_extracted"].is_string());
}

#[tokio::test]
async fn test_state_message() {
    let manager = StateManager::in_memory();
    manager
        .advance(
            "contacts",
            None,
            "updated_at",
            BookmarkValue::Integer(10),
            BookmarkKind::Numeric,
        )
        .await
        .unwrap();

    let message = Message::state(&manager.snapshot().await);
    assert_eq!(message.stream(), None);
    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "type": "STATE",
            "value": {"bookmarks": {"contacts": {
                "replication_key": "updated_at",
                "replication_key_value": 10
            }}}
        })
    );
}

#[test]
fn test_json_lines_writer() {
    let mut writer = JsonLinesWriter::new(Vec::new(), false);
    writer
        .emit(&Message::State {
            value: json!({"bookmarks": {}}),
        })
        .unwrap();
    writer.emit_value(&json!({"type": "SYNC_SUMMARY"})).unwrap();

    let out = lines(writer.into_inner());
    assert_eq!(
        out,
        vec![
            json!({"type": "STATE", "value": {"bookmarks": {}}}),
            json!({"type": "SYNC_SUMMARY"})
        ]
    );
}

#[test]
fn test_pretty_writer_is_multiline() {
    let mut writer = JsonLinesWriter::new(Vec::new(), true);
    writer.emit_value(&json!({"a": 1})).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert!(text.lines().count() > 1);
}

#[test]
fn test_collector_views() {
    let stream = StreamRegistry::global().get("admins").unwrap();
    let schema = Schema::new(vec![Field::string("id")]);
    let record = conform_record(
        "admins",
        &schema,
        &["id".to_string()],
        json!({"id": "a"}).as_object().cloned().unwrap(),
    )
    .unwrap();

    let mut collector = MessageCollector::new();
    collector.emit(&Message::schema(stream)).unwrap();
    collector.emit(&Message::record("admins", &record)).unwrap();
    collector
        .emit(&Message::State {
            value: SyncContext::new().to_value(),
        })
        .unwrap();

    assert_eq!(collector.schemas(), vec!["admins"]);
    assert_eq!(collector.records("admins"), vec![&json!({"id": "a"})]);
    assert!(collector.records("tags").is_empty());
    assert_eq!(collector.states().len(), 1);
}
