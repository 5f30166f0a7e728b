use std::fs;

use chrono::{TimeZone, Utc};
use keyfeed_core::{CodeRecord, Feed};
use keyfeed_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("docs");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("codes.json", "{}").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "{}");

    let second = writer.write("codes.json", "{\"codes\":[]}").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "{\"codes\":[]}");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("codes.json", "data").is_err());
    assert!(!file_path.with_file_name("codes.json").exists());
}

#[test]
fn write_feed_emits_the_external_contract() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let feed = Feed {
        updated_at: Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap(),
        codes: vec![
            CodeRecord {
                code: "AAAAA-BBBBB-CCCCC-DDDDD-EEEEE".to_string(),
                reward: "3 Golden Keys".to_string(),
                expires_at: Some(Utc.with_ymd_and_hms(2026, 9, 30, 23, 59, 59).unwrap()),
                source: "https://example.com/codes".to_string(),
                sites: vec!["SiteA".to_string()],
            },
            CodeRecord {
                code: "ZFKJ3-TT3BB-JTBJT-T3JJT-JWX9H".to_string(),
                reward: "3 Golden Keys".to_string(),
                expires_at: None,
                source: "https://example.com/codes".to_string(),
                sites: vec!["SiteA".to_string()],
            },
        ],
    };

    let path = writer.write_feed("codes.json", &feed).unwrap();
    let written = fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();

    assert!(value["updated"].is_string());
    assert_eq!(value["codes"][0]["code"], "AAAAA-BBBBB-CCCCC-DDDDD-EEEEE");
    assert!(value["codes"][0]["expires"].is_string());
    assert!(value["codes"][1]["expires"].is_null());
    assert_eq!(value["codes"][1]["sites"][0], "SiteA");
}
