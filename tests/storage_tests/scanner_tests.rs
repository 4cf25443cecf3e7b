//! Tests for the linear scanner against real log files
//!
//! These tests verify:
//! - First live match wins, in file order
//! - Tombstoned records are skipped but still walked over
//! - Absence and corruption are distinguishable results

use std::fs::{self, File};
use std::path::PathBuf;

use driftkv::storage::{encode_record, find, FREED, FREED_OFFSET};
use driftkv::DriftError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_log(records: &[(&[u8], &[u8])]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("scan.log");
    let mut log = Vec::new();
    for (key, value) in records {
        log.extend_from_slice(&encode_record(key, value).unwrap());
    }
    fs::write(&path, &log).unwrap();
    (temp_dir, path)
}

fn scan_file(path: &PathBuf, key: &[u8]) -> driftkv::Result<Option<u64>> {
    let mut file = File::open(path).unwrap();
    let end = file.metadata().unwrap().len();
    Ok(find(&mut file, key, end)?.map(|loc| loc.offset))
}

// =============================================================================
// Scanner Tests
// =============================================================================

#[test]
fn test_offsets_follow_record_sizes() {
    let (_temp, path) = write_log(&[(b"one", b"1"), (b"two", b"22"), (b"three", b"333")]);

    assert_eq!(scan_file(&path, b"one").unwrap(), Some(0));
    assert_eq!(scan_file(&path, b"two").unwrap(), Some(13));
    assert_eq!(scan_file(&path, b"three").unwrap(), Some(13 + 14));
}

#[test]
fn test_missing_key_after_full_scan() {
    let (_temp, path) = write_log(&[(b"one", b"1"), (b"two", b"22")]);
    assert_eq!(scan_file(&path, b"four").unwrap(), None);
}

#[test]
fn test_empty_file_is_not_found() {
    let (_temp, path) = write_log(&[]);
    assert_eq!(scan_file(&path, b"").unwrap(), None);
}

#[test]
fn test_tombstoned_duplicate_is_skipped() {
    let (_temp, path) = write_log(&[(b"dup", b"old"), (b"mid", b"m"), (b"dup", b"new")]);
    let mut log = fs::read(&path).unwrap();
    log[FREED_OFFSET as usize] = FREED;
    fs::write(&path, &log).unwrap();

    assert_eq!(scan_file(&path, b"dup").unwrap(), Some(15 + 13));
}

#[test]
fn test_tombstone_only_log_is_not_found() {
    let (_temp, path) = write_log(&[(b"gone", b"value")]);
    let mut log = fs::read(&path).unwrap();
    log[FREED_OFFSET as usize] = 0xff;
    fs::write(&path, &log).unwrap();

    assert_eq!(scan_file(&path, b"gone").unwrap(), None);
}

#[test]
fn test_location_carries_header() {
    let (_temp, path) = write_log(&[(b"a", b"12345")]);
    let mut file = File::open(&path).unwrap();

    let location = find(&mut file, b"a", 15).unwrap().unwrap();

    assert_eq!(location.header.key_len, 1);
    assert_eq!(location.header.value_len, 5);
    assert_eq!(location.value_offset(), 10);
}

#[test]
fn test_garbage_tail_is_corruption_not_absence() {
    let (_temp, path) = write_log(&[(b"a", b"1")]);
    let mut log = fs::read(&path).unwrap();
    log.extend_from_slice(b"junk");
    fs::write(&path, &log).unwrap();

    match scan_file(&path, b"b") {
        Err(DriftError::Corruption { offset, .. }) => assert_eq!(offset, 11),
        other => panic!("expected corruption, got {:?}", other),
    }
}
