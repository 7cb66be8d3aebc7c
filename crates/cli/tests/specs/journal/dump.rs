//! Dump specs

use crate::prelude::*;

#[test]
fn dump_of_empty_store_prints_nothing() {
    let temp = Project::empty();
    let out = temp.tms().args(&["dump"]).passes();
    assert!(out.stdout.is_empty(), "{}", out.stdout);
}

#[test]
fn dump_lists_published_messages_in_order() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "ns:events", "first", "second"])
        .passes();
    temp.tms()
        .args(&["publish", "--topic", "ns:events", "third"])
        .passes();

    let out = temp.tms().args(&["dump"]).passes();
    let lines = out.json_lines();

    let payloads: Vec<&str> = lines.iter().filter_map(|l| l["payload"].as_str()).collect();
    assert_eq!(payloads, ["first", "second", "third"]);
    let first = (lines[0]["timestamp"].as_u64(), lines[0]["sequence_id"].as_u64());
    let second = (lines[1]["timestamp"].as_u64(), lines[1]["sequence_id"].as_u64());
    assert!(first < second, "{:?} then {:?}", first, second);
}

#[test]
fn dump_filters_by_topic() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "ns:a", "one"])
        .passes();
    temp.tms()
        .args(&["publish", "--topic", "ns:b", "two"])
        .passes();

    let out = temp.tms().args(&["dump", "--topic", "ns:b"]).passes();
    let lines = out.json_lines();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["topic"], "ns:b");
    assert_eq!(lines[0]["payload"], "two");
}

#[test]
fn dump_payloads_reads_payload_table() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "ns:events", "--tx", "9", "--payload-table", "body"])
        .passes();

    let messages = temp.tms().args(&["dump"]).passes().json_lines();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].get("payload").is_none());

    let payloads = temp.tms().args(&["dump", "--payloads"]).passes().json_lines();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["payload"], "body");
}

#[test]
fn dump_stops_at_torn_tail() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "ns:events", "kept"])
        .passes();
    let journal = temp.path().join(".tms/messages.jsonl");
    let mut content = std::fs::read_to_string(&journal).unwrap();
    content.push_str("{\"entry\":{\"topic\"");
    std::fs::write(&journal, content).unwrap();

    let out = temp.tms().args(&["dump"]).passes();

    assert_eq!(out.json_lines().len(), 1);
}

#[test]
fn publish_after_torn_tail_repairs_journal() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "ns:events", "kept"])
        .passes();
    let journal = temp.path().join(".tms/messages.jsonl");
    let mut content = std::fs::read_to_string(&journal).unwrap();
    content.push_str("{\"entry\":{\"topic\"");
    std::fs::write(&journal, content).unwrap();

    temp.tms()
        .args(&["publish", "--topic", "ns:events", "after"])
        .passes();

    let out = temp.tms().args(&["dump"]).passes();
    let payloads: Vec<String> = out
        .json_lines()
        .iter()
        .filter_map(|l| l["payload"].as_str().map(str::to_string))
        .collect();
    assert_eq!(payloads, ["kept", "after"]);
}
