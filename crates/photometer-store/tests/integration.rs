use photometer_store::{BlobStore, BlobStoreExt, Error, FileStore};
use tempfile::tempdir;

#[test]
fn test_file_store_creates_root_on_first_write() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("nested").join("data");
    let store = FileStore::new(&root);

    assert!(store.get("history").unwrap().is_none());
    assert!(!root.exists());

    store.put("history", b"[]").unwrap();

    assert!(root.join("history.json").exists());
    assert_eq!(store.get("history").unwrap(), Some(b"[]".to_vec()));
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempdir().unwrap();

    FileStore::new(dir.path())
        .save_json("logs", &vec![3_i64, 2, 1])
        .unwrap();

    let reopened = FileStore::new(dir.path());
    let logs: Option<Vec<i64>> = reopened.load_json("logs").unwrap();
    assert_eq!(logs, Some(vec![3, 2, 1]));
}

#[test]
fn test_file_store_remove() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.put("logs", b"[1]").unwrap();
    store.remove("logs").unwrap();

    assert!(store.get("logs").unwrap().is_none());
    assert!(store.remove("logs").is_ok());
}

#[test]
fn test_file_store_rejects_traversal_keys() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let err = store.put("../escape", b"x").unwrap_err();
    assert!(matches!(err, Error::InvalidKey(_)));
}
