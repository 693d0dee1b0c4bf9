use std::fs;
use quickprint_engine::{ensure_data_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("quickprint");
    assert!(!new_dir.exists());
    ensure_data_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rejects_data_dir_that_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("quickprint");
    fs::write(&file_path, "x").unwrap();
    assert!(ensure_data_dir(&file_path).is_err());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("history.json", "[]").unwrap();
    assert_eq!(first.file_name().unwrap(), "history.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "[]");

    let second = writer.write("history.json", "[1]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[1]");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("history.json", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("history.json").exists());
}

#[test]
fn remove_tolerates_missing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    writer.remove("history.json").unwrap();

    writer.write("history.json", "[]").unwrap();
    writer.remove("history.json").unwrap();
    assert!(!temp.path().join("history.json").exists());
}
