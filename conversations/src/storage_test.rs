use super::*;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("docchat-storage-{}", uuid::Uuid::new_v4()))
        .join(name)
}

// =============================================================================
// FileStore
// =============================================================================

#[test]
fn file_store_reports_its_path() {
    let path = scratch_path("conversations.json");
    let store = FileStore::new(&path);
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn file_store_missing_file_loads_none() {
    let store = FileStore::new(scratch_path("conversations.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn file_store_save_creates_parent_dirs_and_round_trips() {
    let path = scratch_path("nested/conversations.json");
    let store = FileStore::new(&path);
    store.save("[1,2,3]").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("[1,2,3]"));
    assert!(path.exists());
    let _ = fs::remove_dir_all(path.parent().unwrap().parent().unwrap());
}

#[test]
fn file_store_save_overwrites_previous_payload() {
    let path = scratch_path("conversations.json");
    let store = FileStore::new(&path);
    store.save("first").unwrap();
    store.save("second").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_store_load_of_directory_is_an_error() {
    let dir = scratch_path("dir");
    fs::create_dir_all(&dir).unwrap();
    let store = FileStore::new(&dir);
    assert!(matches!(store.load(), Err(StorageError::Io { .. })));
    let _ = fs::remove_dir_all(dir.parent().unwrap());
}

// =============================================================================
// MemoryStore
// =============================================================================

#[test]
fn memory_store_starts_empty() {
    let store = MemoryStore::new();
    assert!(store.load().unwrap().is_none());
    assert!(store.payload().is_none());
}

#[test]
fn memory_store_with_payload_loads_it() {
    let store = MemoryStore::with_payload("[]");
    assert_eq!(store.load().unwrap().as_deref(), Some("[]"));
}

#[test]
fn memory_store_failing_rejects_saves() {
    let store = MemoryStore::failing();
    assert!(matches!(store.save("[]"), Err(StorageError::Unavailable(_))));
    assert!(store.payload().is_none());
}

#[test]
fn borrowed_store_delegates() {
    let store = MemoryStore::new();
    let borrowed = &store;
    borrowed.save("x").unwrap();
    assert_eq!(store.payload().as_deref(), Some("x"));
}
