use super::*;
use serde_json::json;
use std::io::Write;

#[test]
fn parse_rejects_invalid_json() {
    let err = Record::parse("{not json").unwrap_err();
    assert!(matches!(err, RecordError::Malformed(_)));
}

#[test]
fn parse_accepts_any_json_value() {
    // Shape is not validated here; accessors just come back empty.
    let record = Record::parse("42").unwrap();
    assert_eq!(record.record_type(), None);
    assert_eq!(record.role(), None);
    assert!(!record.is_meta());
}

#[test]
fn accessors_on_user_text_message() {
    let record = Record::from(json!({
        "type": "user",
        "sessionId": "sess-1",
        "timestamp": "2025-01-01T00:00:00Z",
        "isMeta": false,
        "message": { "role": "user", "content": "hello world" }
    }));
    assert_eq!(record.record_type(), Some("user"));
    assert_eq!(record.session_id(), Some("sess-1"));
    assert_eq!(record.timestamp(), Some("2025-01-01T00:00:00Z"));
    assert_eq!(record.role(), Some("user"));
    assert_eq!(record.content(), Some(Content::Text("hello world")));
    assert!(record.tool_use_result().is_none());
    assert!(!record.is_meta());
}

#[test]
fn content_items_are_exposed_in_order() {
    let record = Record::from(json!({
        "message": {
            "role": "assistant",
            "content": [
                { "type": "text", "text": "a" },
                { "type": "tool_use", "name": "grep" }
            ]
        }
    }));
    match record.content() {
        Some(Content::Items(items)) => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[0]["text"], "a");
            assert_eq!(items[1]["name"], "grep");
        }
        other => panic!("expected Items, got {:?}", other),
    }
}

#[test]
fn wrong_shapes_degrade_to_none() {
    let record = Record::from(json!({
        "type": 7,
        "summary": "",
        "sessionId": "",
        "message": "not an object",
        "toolUseResult": null,
        "isMeta": "yes"
    }));
    assert_eq!(record.record_type(), None);
    assert_eq!(record.summary(), None);
    assert_eq!(record.session_id(), None);
    assert!(record.message().is_none());
    assert!(record.content().is_none());
    assert!(record.tool_use_result().is_none());
    assert!(!record.is_meta());
}

#[test]
fn summary_record_is_recognized() {
    let record = Record::parse(r#"{"type":"summary","summary":"Fix login bug","leafUuid":"x"}"#)
        .unwrap();
    assert!(record.is_summary());
    assert_eq!(record.summary(), Some("Fix login bug"));
}

#[test]
fn empty_timestamp_is_preserved() {
    let record = Record::from(json!({ "sessionId": "x", "timestamp": "" }));
    assert_eq!(record.timestamp(), Some(""));
}

#[test]
fn read_leading_collects_malformed_lines() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, r#"{{"type":"summary","summary":"s"}}"#).unwrap();
    writeln!(f).unwrap();
    writeln!(f, "{{truncated").unwrap();
    writeln!(f, r#"{{"sessionId":"abc","timestamp":"t"}}"#).unwrap();

    let leading = read_leading(f.path(), None).unwrap();
    assert_eq!(leading.records.len(), 2);
    assert_eq!(leading.malformed.len(), 1);
    assert_eq!(leading.malformed[0].0, 3);
}

#[test]
fn read_leading_counts_non_utf8_line_as_malformed() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"{\"type\":\"summary\",\"summary\":\"s\"}\n").unwrap();
    f.write_all(b"{\"content\":\"caf\xe9\"}\n").unwrap();
    f.write_all(b"{\"sessionId\":\"abc\",\"timestamp\":\"t\"}\n").unwrap();

    let leading = read_leading(f.path(), None).unwrap();
    assert_eq!(leading.records.len(), 2);
    assert_eq!(leading.malformed.len(), 1);
    assert_eq!(leading.malformed[0].0, 2);
}

#[test]
fn read_leading_honors_limit() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    for i in 0..20 {
        writeln!(f, r#"{{"type":"t{i}"}}"#).unwrap();
    }
    let leading = read_leading(f.path(), Some(10)).unwrap();
    assert_eq!(leading.records.len(), 10);
    assert_eq!(leading.records[9].record_type(), Some("t9"));
}
