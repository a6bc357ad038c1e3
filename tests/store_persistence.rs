use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use syltrack::error::StoreError;
use syltrack::model::{Task, TaskDraft, TaskKind, TaskStatus};
use syltrack::storage::LocalStorage;
use syltrack::store::TaskStore;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn draft(subject: &str, desc: &str, due_in: i64) -> TaskDraft {
    let mut d = TaskDraft::new(subject, today());
    d.description = desc.to_string();
    d.submit_by = today() + Duration::days(due_in);
    d
}

fn open(dir: &tempfile::TempDir) -> TaskStore {
    TaskStore::load(LocalStorage::new(dir.path()).unwrap())
}

/// What is on disk right now, keyed by id.
fn on_disk(store: &TaskStore) -> HashMap<String, Task> {
    let json = fs::read_to_string(store.storage().tasks_path()).unwrap();
    let tasks: Vec<Task> = serde_json::from_str(&json).unwrap();
    tasks.into_iter().map(|t| (t.id.clone(), t)).collect()
}

fn in_memory(store: &TaskStore) -> HashMap<String, Task> {
    store
        .tasks()
        .into_iter()
        .map(|t| (t.id.clone(), t.clone()))
        .collect()
}

#[test]
fn test_first_run_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);

    assert!(store.is_empty());
    assert!(store.ongoing_chapters().is_empty());
    assert!(store.warnings().is_empty());
}

#[test]
fn test_file_tracks_every_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);

    let a = store
        .create_task(draft("Computer Networks", "Subnetting sheet", 2))
        .unwrap()
        .id
        .clone();
    assert_eq!(on_disk(&store), in_memory(&store));

    let b = store
        .create_task(draft("Operating Systems", "Scheduler sim", 9))
        .unwrap()
        .id
        .clone();
    assert_ne!(a, b);
    assert_eq!(on_disk(&store), in_memory(&store));

    let mut edit = store.get(&a).unwrap().to_draft();
    edit.status = TaskStatus::InProgress;
    edit.kind = TaskKind::LabReport;
    let updated = store.update_task(&a, edit).unwrap();
    assert_eq!(updated.id, a);
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(on_disk(&store), in_memory(&store));

    store.delete_task(&b).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(on_disk(&store), in_memory(&store));
}

#[test]
fn test_unknown_id_leaves_store_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store
        .create_task(draft("Artificial Intelligence", "Agent essay", 5))
        .unwrap();
    let before = in_memory(&store);

    let err = store.delete_task("no-such-id").unwrap_err();
    assert!(matches!(err, StoreError::TaskNotFound(ref id) if id == "no-such-id"));

    let err = store
        .update_task("no-such-id", draft("AI", "x", 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::TaskNotFound(_)));

    assert_eq!(in_memory(&store), before);
    assert_eq!(on_disk(&store), before);
}

#[test]
fn test_reload_reproduces_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store
        .create_task(draft("Theory of Computation", "DFA exercises", -1))
        .unwrap();
    store
        .create_task(draft("Database Management System", "ER diagram", 0))
        .unwrap();
    store
        .set_ongoing_chapter("Theory of Computation", "Unit II: Introduction to Finite Automata")
        .unwrap();
    store
        .set_ongoing_chapter("Database Management System", "Unit 6: SQL")
        .unwrap();

    let tasks_before = in_memory(&store);
    let ongoing_before = store.ongoing_chapters().clone();
    store.close().unwrap();

    let reloaded = open(&dir);
    assert_eq!(in_memory(&reloaded), tasks_before);
    assert_eq!(reloaded.ongoing_chapters(), &ongoing_before);
    assert_eq!(
        reloaded.ongoing_chapter("Database Management System"),
        Some("Unit 6: SQL")
    );
}

#[test]
fn test_ongoing_chapter_file_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.set_ongoing_chapter("Operating Systems", "Unit 1: Operating System Overview").unwrap();
    store.set_ongoing_chapter("Operating Systems", "Unit 3: Process Deadlocks").unwrap();

    let json = fs::read_to_string(store.storage().ongoing_path()).unwrap();
    let map: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["Operating Systems"], "Unit 3: Process Deadlocks");

    assert!(store.clear_ongoing_chapter("Operating Systems").unwrap());
    assert!(!store.clear_ongoing_chapter("Operating Systems").unwrap());
    let json = fs::read_to_string(store.storage().ongoing_path()).unwrap();
    assert_eq!(json.trim(), "{}");
}

#[test]
fn test_malformed_file_falls_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path()).unwrap();
    fs::write(storage.tasks_path(), "[{ this is not json").unwrap();
    fs::write(storage.ongoing_path(), r#"{"AI": "Unit I: Introduction"}"#).unwrap();

    let mut store = TaskStore::load(storage);
    assert!(store.is_empty());
    assert_eq!(store.warnings().len(), 1);
    assert_eq!(store.ongoing_chapter("AI"), Some("Unit I: Introduction"));

    let backup = dir.path().join("tasks.json.bak");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "[{ this is not json");

    // The next write replaces the broken document; the copy stays.
    store.create_task(draft("AI", "Fresh start", 3)).unwrap();
    assert_eq!(on_disk(&store), in_memory(&store));
    assert_eq!(fs::read_to_string(&backup).unwrap(), "[{ this is not json");
}

const ONE_BAD_RECORD: &str = r#"[
  {"id":"1","subject":"AI","type":"Assignment","description":"keep me",
   "date_assigned":"2026-10-01","submit_by":"2026-10-20","status":"Pending"},
  {"id":"2","subject":"AI","type":"Assignment","description":"typo",
   "date_assigned":"2026-10-01","submit_by":"2026-10-20","status":"Done"}
]"#;

#[test]
fn test_bad_record_survives_open_and_close() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path()).unwrap();
    fs::write(storage.tasks_path(), ONE_BAD_RECORD).unwrap();

    let store = TaskStore::load(storage.clone());
    assert!(store.is_empty());
    assert_eq!(store.warnings().len(), 1);
    store.close().unwrap();

    assert_eq!(fs::read_to_string(storage.tasks_path()).unwrap(), ONE_BAD_RECORD);
    assert_eq!(
        fs::read_to_string(dir.path().join("tasks.json.bak")).unwrap(),
        ONE_BAD_RECORD
    );
    // The ongoing file loaded fine (it was missing) and is still flushed.
    assert!(storage.ongoing_path().exists());
}

#[test]
fn test_malformed_ongoing_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path()).unwrap();
    fs::write(storage.ongoing_path(), r#"{"AI": 3}"#).unwrap();

    let mut store = TaskStore::load(storage.clone());
    assert!(store.ongoing_chapters().is_empty());
    assert_eq!(store.warnings().len(), 1);
    assert!(store.warnings()[0].contains("ongoing_chapters.json"));

    // Task writes do not touch the unreadable ongoing document.
    store.create_task(draft("AI", "Essay", 2)).unwrap();
    let reopened_tasks = in_memory(&store);
    store.close().unwrap();
    assert_eq!(fs::read_to_string(storage.ongoing_path()).unwrap(), r#"{"AI": 3}"#);

    // Setting a chapter is an explicit change, so it replaces the file.
    let mut store = TaskStore::load(storage.clone());
    assert_eq!(in_memory(&store), reopened_tasks);
    store.set_ongoing_chapter("AI", "Unit I: Introduction").unwrap();
    store.close().unwrap();

    let reloaded = TaskStore::load(storage);
    assert!(reloaded.warnings().is_empty());
    assert_eq!(reloaded.ongoing_chapter("AI"), Some("Unit I: Introduction"));
}

/// Swaps a document for a directory so the rename in the next save fails.
fn block_writes(path: &std::path::Path) {
    if path.exists() {
        fs::remove_file(path).unwrap();
    }
    fs::create_dir(path).unwrap();
}

#[test]
fn test_failed_task_write_leaves_memory_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    let id = store
        .create_task(draft("Operating Systems", "Paging notes", 6))
        .unwrap()
        .id
        .clone();
    let before = in_memory(&store);
    block_writes(&store.storage().tasks_path());

    let err = store
        .create_task(draft("Operating Systems", "Never stored", 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert_eq!(in_memory(&store), before);

    let mut edit = store.get(&id).unwrap().to_draft();
    edit.description = "Changed".to_string();
    assert!(store.update_task(&id, edit).is_err());
    assert_eq!(in_memory(&store), before);

    assert!(store.delete_task(&id).is_err());
    assert_eq!(in_memory(&store), before);
}

#[test]
fn test_failed_ongoing_write_leaves_memory_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.set_ongoing_chapter("AI", "Unit I: Introduction").unwrap();
    let before = store.ongoing_chapters().clone();
    block_writes(&store.storage().ongoing_path());

    assert!(store.set_ongoing_chapter("AI", "Unit II: Intelligent Agents").is_err());
    assert_eq!(store.ongoing_chapters(), &before);

    assert!(store.clear_ongoing_chapter("AI").is_err());
    assert_eq!(store.ongoing_chapter("AI"), Some("Unit I: Introduction"));
}

#[test]
fn test_task_file_uses_documented_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store
        .create_task(draft("Computer Networks", "Packet tracer lab", 4))
        .unwrap();

    let json = fs::read_to_string(store.storage().tasks_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let obj = value[0].as_object().unwrap();
    for key in [
        "id",
        "subject",
        "type",
        "description",
        "date_assigned",
        "submit_by",
        "status",
    ] {
        assert!(obj.contains_key(key), "missing {}", key);
    }
    assert_eq!(obj["date_assigned"], "2026-10-17");
    assert_eq!(obj["submit_by"], "2026-10-21");
    assert_eq!(obj["status"], "Pending");
}
