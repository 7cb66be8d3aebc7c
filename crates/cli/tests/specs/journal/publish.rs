//! Publish specs

use crate::prelude::*;

#[test]
fn publish_prints_receipt_with_positions() {
    let temp = Project::empty();
    let out = temp
        .tms()
        .args(&["publish", "--topic", "ns:events", "a", "b", "c"])
        .passes();

    let receipts = out.json_lines();
    assert_eq!(receipts.len(), 1);
    let receipt = &receipts[0];
    assert_eq!(receipt["entries"], 3);
    assert_eq!(receipt["topic"]["namespace"], "ns");
    assert_eq!(receipt["first"]["sequence_id"], 0);
    assert_eq!(receipt["last"]["sequence_id"], 2);
    assert!(temp.path().join(".tms/messages.jsonl").is_file());
}

#[test]
fn transactional_publish_without_payloads_writes_a_reference() {
    let temp = Project::empty();
    let out = temp
        .tms()
        .args(&["publish", "--topic", "ns:events", "--tx", "42"])
        .passes();

    assert_eq!(out.json_lines()[0]["entries"], 1);
}

#[test]
fn payload_table_publish_writes_both_tables() {
    let temp = Project::empty();
    let out = temp
        .tms()
        .args(&["publish", "--topic", "ns:events", "--tx", "7", "--payload-table", "x", "y"])
        .passes();

    let receipts = out.json_lines();
    assert_eq!(receipts.len(), 2);
    assert_eq!(receipts[0]["entries"], 2);
    assert_eq!(receipts[1]["entries"], 1);
    assert!(temp.path().join(".tms/payloads.jsonl").is_file());
}

#[test]
fn dir_flag_overrides_storage_location() {
    let temp = Project::empty();
    temp.tms()
        .args(&["--dir", "elsewhere", "publish", "--topic", "ns:events", "a"])
        .passes();

    assert!(temp.path().join("elsewhere/messages.jsonl").is_file());
    assert!(!temp.path().join(".tms").exists());
}

#[test]
fn config_file_sets_storage_location() {
    let temp = Project::empty();
    temp.file("tms.toml", "[storage]\ndir = \"data\"\nsync = false\n");
    temp.tms()
        .args(&["--config", "tms.toml", "publish", "--topic", "ns:events", "a"])
        .passes();

    assert!(temp.path().join("data/messages.jsonl").is_file());
}
