//! Tests that drive `run_handshake` end to end against the memory store.

use crate::cli::commands::{run_handshake, ScriptEdit};
use sitescript_core::handshake::{PREPROCESSING_RESULTS_KEY, PRINT_PAGE_TITLE};
use sitescript_core::host_key::HostKey;
use sitescript_core::store::{MemoryStore, ScriptStore};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_payload(dir: &TempDir, url: &str) -> PathBuf {
    let path = dir.path().join("page.json");
    let payload = format!(
        r#"{{"{key}": {{"title": "Example", "URL": "{url}"}}}}"#,
        key = PREPROCESSING_RESULTS_KEY,
    );
    std::fs::write(&path, payload).unwrap();
    path
}

fn example_key() -> HostKey {
    HostKey::from_string_key("example.com").unwrap()
}

async fn stored(store: &MemoryStore) -> String {
    store.get(&example_key()).await.unwrap().into_source()
}

#[tokio::test]
async fn keep_preserves_seeded_script() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(&dir, "https://example.com/page");
    let store = MemoryStore::new();
    store.put(&example_key(), "seeded();".into()).await.unwrap();

    run_handshake(&store, Some(input.as_path()), ScriptEdit::Keep).await.unwrap();

    assert_eq!(stored(&store).await, "seeded();");
    assert_eq!(store.hosts().await.unwrap(), vec![example_key()]);
}

#[tokio::test]
async fn replace_saves_new_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(&dir, "https://example.com/page");
    let store = MemoryStore::new();
    store.put(&example_key(), "old();".into()).await.unwrap();

    run_handshake(&store, Some(input.as_path()), ScriptEdit::Replace("new();".into()))
        .await
        .unwrap();

    assert_eq!(stored(&store).await, "new();");
}

#[tokio::test]
async fn replace_from_file_saves_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(&dir, "https://example.com/page");
    let script_path = dir.path().join("script.js");
    std::fs::write(&script_path, "console.log('from file');\n").unwrap();
    let store = MemoryStore::new();

    run_handshake(&store, Some(input.as_path()), ScriptEdit::ReplaceFromFile(script_path))
        .await
        .unwrap();

    assert_eq!(stored(&store).await, "console.log('from file');\n");
}

#[tokio::test]
async fn template_saves_template_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(&dir, "https://example.com/other");
    let store = MemoryStore::new();

    run_handshake(&store, Some(input.as_path()), ScriptEdit::Template(&PRINT_PAGE_TITLE))
        .await
        .unwrap();

    assert_eq!(stored(&store).await, PRINT_PAGE_TITLE.source);
}

#[tokio::test]
async fn payload_without_host_succeeds_and_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(&dir, "not a url");
    let store = MemoryStore::new();

    run_handshake(&store, Some(input.as_path()), ScriptEdit::Replace("alert(1)".into()))
        .await
        .unwrap();

    assert!(store.hosts().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_payload_file_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.json");
    std::fs::write(&input, "{ broken").unwrap();
    let store = MemoryStore::new();

    run_handshake(&store, Some(input.as_path()), ScriptEdit::Keep).await.unwrap();

    assert!(store.hosts().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_input_or_script_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();

    let missing = dir.path().join("absent.json");
    let err = run_handshake(&store, Some(missing.as_path()), ScriptEdit::Keep)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("read payload"));

    let input = write_payload(&dir, "https://example.com/");
    let err = run_handshake(
        &store,
        Some(input.as_path()),
        ScriptEdit::ReplaceFromFile(dir.path().join("absent.js")),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("read script"));
    assert!(store.hosts().await.unwrap().is_empty());
}
