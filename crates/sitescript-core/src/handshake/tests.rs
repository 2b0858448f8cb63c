//! Tests for payload parsing and the session lifecycle against the memory store.

use serde_json::json;

use crate::host_key::HostKey;
use crate::store::{MemoryStore, ScriptStore};

use super::*;

#[test]
fn inbound_payload_extracts_title_and_url() {
    let value = json!({
        PREPROCESSING_RESULTS_KEY: { "title": "Example", "URL": "https://example.com/page" }
    });
    let ctx = SessionContext::from_inbound(&value);
    assert_eq!(ctx, SessionContext::new("Example", "https://example.com/page"));
    assert_eq!(ctx.host_key().unwrap().as_str(), "example.com");
}

#[test]
fn inbound_payload_missing_keys_default_to_empty() {
    let value = json!({ PREPROCESSING_RESULTS_KEY: { "title": "Only title" } });
    let ctx = SessionContext::from_inbound(&value);
    assert_eq!(ctx.title, "Only title");
    assert_eq!(ctx.url, "");
    assert!(ctx.host_key().is_none());
}

#[test]
fn inbound_payload_wrong_shapes_degrade_to_empty() {
    for value in [
        json!(null),
        json!([1, 2, 3]),
        json!("just a string"),
        json!({}),
        json!({ PREPROCESSING_RESULTS_KEY: "not an object" }),
        json!({ PREPROCESSING_RESULTS_KEY: { "title": 7, "URL": ["x"] } }),
    ] {
        assert_eq!(SessionContext::from_inbound(&value), SessionContext::default());
    }
}

#[test]
fn malformed_json_text_degrades_to_empty_context() {
    assert_eq!(SessionContext::from_json_str("{ nope"), SessionContext::default());
    assert_eq!(SessionContext::from_json_str(""), SessionContext::default());
}

#[test]
fn url_key_is_case_sensitive() {
    let value = json!({ PREPROCESSING_RESULTS_KEY: { "url": "https://example.com/" } });
    assert_eq!(SessionContext::from_inbound(&value).url, "");
}

#[test]
fn finalize_payload_wire_shape() {
    let payload = FinalizePayload::new("alert(1);");
    let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({ FINALIZE_ARGUMENT_KEY: { "customJavaScript": "alert(1);" } })
    );
    assert_eq!(payload.custom_javascript(), "alert(1);");
}

#[test]
fn find_template_by_slug_or_name() {
    assert_eq!(find_template("page-title"), Some(&PRINT_PAGE_TITLE));
    assert_eq!(find_template("print page title"), Some(&PRINT_PAGE_TITLE));
    assert!(find_template("nope").is_none());
}

#[tokio::test]
async fn open_seeds_stored_script_for_host() {
    let store = MemoryStore::new();
    let key = HostKey::from_url("https://example.com/").unwrap();
    store.put(&key, "console.log(1);".into()).await.unwrap();

    let session =
        HandshakeSession::open(&store, SessionContext::new("T", "https://example.com/deep/link"))
            .await;
    assert!(session.is_persistent());
    assert_eq!(session.title(), "T");
    assert_eq!(session.script(), "console.log(1);");
}

#[tokio::test]
async fn open_without_record_starts_empty() {
    let store = MemoryStore::new();
    let session =
        HandshakeSession::open(&store, SessionContext::new("", "https://fresh.example/")).await;
    assert_eq!(session.script(), "");
    assert_eq!(session.host().map(HostKey::as_str), Some("fresh.example"));
}

#[tokio::test]
async fn load_template_replaces_text_without_touching_store() {
    let store = MemoryStore::new();
    let mut session =
        HandshakeSession::open(&store, SessionContext::new("", "https://example.com/")).await;
    session.set_script("draft");
    session.load_template(&PRINT_PAGE_TITLE);
    assert_eq!(session.script(), "alert(document.title);");
    assert!(store.hosts().await.unwrap().is_empty());
}

#[tokio::test]
async fn dropping_session_before_finish_writes_nothing() {
    let store = MemoryStore::new();
    {
        let mut session =
            HandshakeSession::open(&store, SessionContext::new("", "https://example.com/")).await;
        session.set_script("unsaved");
    }
    assert!(store.hosts().await.unwrap().is_empty());
}

#[tokio::test]
async fn finish_saves_then_returns_payload() {
    let store = MemoryStore::new();
    let mut session =
        HandshakeSession::open(&store, SessionContext::new("", "https://example.com/")).await;
    session.set_script("  let x = 1;\n\talert(x);\n");
    let done = session.finish().await;

    assert!(done.save.is_saved());
    assert_eq!(done.payload.custom_javascript(), "  let x = 1;\n\talert(x);\n");
    let key = HostKey::from_url("https://example.com/").unwrap();
    assert_eq!(
        store.get(&key).await.unwrap().as_str(),
        "  let x = 1;\n\talert(x);\n"
    );
}

#[tokio::test]
async fn finish_persists_empty_text_as_an_entry() {
    let store = MemoryStore::new();
    let session =
        HandshakeSession::open(&store, SessionContext::new("", "https://example.com/")).await;
    let done = session.finish().await;
    assert!(done.save.is_saved());
    assert_eq!(store.hosts().await.unwrap().len(), 1);
}
