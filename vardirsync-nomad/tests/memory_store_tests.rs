use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use vardirsync_nomad::{MemoryVariableStore, NomadError, Variable, VariableStore, WriteMode};

fn var(path: &str, contents: &str) -> Variable {
    Variable::new(
        path,
        BTreeMap::from([("contents".to_string(), contents.to_string())]),
    )
}

#[tokio::test]
async fn create_then_read() {
    let store = MemoryVariableStore::new();
    store.create(&var("app/a", "1"), WriteMode::Create).await.unwrap();

    let read = store.read("app/a").await.unwrap();
    assert_eq!(read.items.get("contents").map(String::as_str), Some("1"));
    assert!(read.create_index > 0);
}

#[tokio::test]
async fn create_mode_rejects_existing_path() {
    let store = MemoryVariableStore::new();
    store.create(&var("app/a", "1"), WriteMode::Create).await.unwrap();

    let result = store.create(&var("app/a", "2"), WriteMode::Create).await;
    assert!(matches!(result.unwrap_err(), NomadError::Conflict(_)));
    let read = store.read("app/a").await.unwrap();
    assert_eq!(read.items.get("contents").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn upsert_overwrites_and_keeps_create_index() {
    let store = MemoryVariableStore::new();
    store.create(&var("app/a", "1"), WriteMode::Upsert).await.unwrap();
    let first = store.read("app/a").await.unwrap();

    store.create(&var("app/a", "2"), WriteMode::Upsert).await.unwrap();
    let second = store.read("app/a").await.unwrap();

    assert_eq!(second.items.get("contents").map(String::as_str), Some("2"));
    assert_eq!(second.create_index, first.create_index);
    assert!(second.modify_index > first.modify_index);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn list_is_raw_prefix_and_sorted() {
    let store = MemoryVariableStore::new();
    for path in ["app/b", "app/a", "app2/x", "other/y"] {
        store.insert(var(path, "")).await;
    }

    let listed: Vec<String> = store
        .list("app")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.path)
        .collect();
    assert_eq!(listed, vec!["app/a", "app/b", "app2/x"]);
}

#[tokio::test]
async fn read_missing_is_not_found() {
    let store = MemoryVariableStore::new();
    let result = store.read("nope").await;
    assert!(matches!(result.unwrap_err(), NomadError::NotFound(_)));
}

#[tokio::test]
async fn injected_failures() {
    let store = MemoryVariableStore::new();
    store.insert(var("app/a", "1")).await;
    store.fail_reads_of("app/a").await;
    store.fail_writes_to("app/b").await;

    assert!(matches!(store.read("app/a").await, Err(NomadError::Api(_))));
    assert!(matches!(
        store.create(&var("app/b", ""), WriteMode::Upsert).await,
        Err(NomadError::Api(_))
    ));
    assert!(store.get("app/b").await.is_none());
    assert!(store.write_log().await.is_empty());
}
