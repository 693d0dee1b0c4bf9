use std::fs;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use quickprint_core::{JobResult, PrintJob, PrintSettings, ResultStatus, TxId, MAX_HISTORY_ITEMS};
use quickprint_engine::{HistoryStore, HISTORY_FILENAME};
use tempfile::TempDir;

fn job(n: u32) -> PrintJob {
    PrintJob {
        txid: TxId::from(format!("tx-{n}")),
        filename: format!("doc-{n}.pdf"),
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, n).unwrap(),
        binary_bytes: 3_000,
        base64_bytes: 4_000,
        settings: PrintSettings::default(),
        result: None,
    }
}

fn failure(code: i64) -> JobResult {
    JobResult {
        status: ResultStatus::Fail,
        code: Some(code),
        message: Some("Paper out".to_string()),
        at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 5, 0).unwrap(),
    }
}

#[test]
fn missing_file_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());
    assert!(store.load().is_empty());
}

#[test]
fn keeps_only_the_most_recent_jobs() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());
    for n in 0..25 {
        store.append(job(n));
    }

    let jobs = store.load();
    assert_eq!(jobs.len(), MAX_HISTORY_ITEMS);
    assert_eq!(jobs.first().unwrap().txid, TxId::from("tx-5"));
    assert_eq!(jobs.last().unwrap().txid, TxId::from("tx-24"));
}

#[test]
fn records_result_for_known_job() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());
    store.append(job(1));
    store.append(job(2));

    store.update_result(&TxId::from("tx-1"), failure(4));

    let jobs = store.load();
    assert_eq!(jobs[0].result, Some(failure(4)));
    assert!(jobs[0].is_failed());
    assert_eq!(jobs[1].result, None);
}

#[test]
fn unknown_job_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());
    store.append(job(1));
    let before = fs::read_to_string(store.path()).unwrap();

    store.update_result(&TxId::from("evicted"), failure(1));

    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn corrupt_file_loads_as_empty_and_is_replaced_on_append() {
    quickprint_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(HISTORY_FILENAME), "{not json").unwrap();
    let store = HistoryStore::new(temp.path());

    assert!(store.load().is_empty());
    store.append(job(3));
    assert_eq!(store.load(), vec![job(3)]);
}

#[test]
fn loads_records_with_missing_optional_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(HISTORY_FILENAME),
        r#"[{"txid":"old","filename":"legacy.pdf","createdAt":"2025-12-31T23:00:00Z",
            "binaryBytes":10,"base64Bytes":16}]"#,
    )
    .unwrap();
    let store = HistoryStore::new(temp.path());

    let jobs = store.load();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].txid, TxId::from("old"));
    assert!(jobs[0].settings.fit_to_width);
    assert_eq!(jobs[0].settings.rotation, None);
    assert_eq!(jobs[0].result, None);
}

#[test]
fn clear_removes_everything() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());
    store.append(job(1));

    store.clear();

    assert!(!store.path().exists());
    assert!(store.load().is_empty());
    store.clear();
}

#[test]
fn creates_data_dir_on_first_append() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path().join("nested").join("quickprint"));
    store.append(job(1));
    assert_eq!(store.load().len(), 1);
}

#[test]
fn unwritable_data_dir_is_tolerated() {
    quickprint_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("quickprint");
    fs::write(&blocker, "not a directory").unwrap();
    let store = HistoryStore::new(&blocker);

    store.append(job(1));
    store.update_result(&TxId::from("tx-1"), failure(2));
    store.clear();

    assert!(store.load().is_empty());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
}
