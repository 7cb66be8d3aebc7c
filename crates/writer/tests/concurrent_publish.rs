// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-threaded publish properties: no loss, no duplication, per-publisher
//! order and unique increasing positions.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread;
use tms_core::{
    IncrementalTimeProvider, MessageEntry, PublishRequest, SystemTimeProvider, TimeProvider,
    TopicId,
};
use tms_storage::{JournalReader, JournalTable, MemoryTable, StorageTable};
use tms_writer::{ConcurrentMessageWriter, MessageTableWriter};

fn topic() -> TopicId {
    TopicId::new("ns1", "t1")
}

/// Payload naming its publisher, request and index: `p{thread}-r{request}-{i}`
fn payload(publisher: usize, request: usize, i: usize) -> String {
    format!("p{}-r{}-{}", publisher, request, i)
}

/// Each publisher sends `requests[k]` payloads in its k-th request
fn publish_all<T, C>(
    writer: &ConcurrentMessageWriter<MessageTableWriter<T, C>>,
    plan: &[Vec<usize>],
) where
    T: StorageTable<Entry = MessageEntry>,
    C: TimeProvider,
{
    thread::scope(|s| {
        for (publisher, requests) in plan.iter().enumerate() {
            s.spawn(move || {
                for (request, &count) in requests.iter().enumerate() {
                    let payloads: Vec<String> =
                        (0..count).map(|i| payload(publisher, request, i)).collect();
                    writer
                        .persist(PublishRequest::from_strings(topic(), &payloads))
                        .unwrap();
                }
            });
        }
    });
}

fn check_written(entries: &[MessageEntry], plan: &[Vec<usize>]) {
    // Positions are unique and strictly increasing in write order
    for pair in entries.windows(2) {
        assert!(
            pair[0].position() < pair[1].position(),
            "{} then {}",
            pair[0].position(),
            pair[1].position()
        );
    }

    // Per publisher, payloads appear exactly once and in publish order
    let mut seen: HashMap<usize, Vec<String>> = HashMap::new();
    for entry in entries {
        let text = String::from_utf8(entry.payload.clone().unwrap()).unwrap();
        let publisher: usize = text[1..text.find('-').unwrap()].parse().unwrap();
        seen.entry(publisher).or_default().push(text);
    }
    for (publisher, requests) in plan.iter().enumerate() {
        let expected: Vec<String> = requests
            .iter()
            .enumerate()
            .flat_map(|(request, &count)| (0..count).map(move |i| payload(publisher, request, i)))
            .collect();
        let actual = seen.remove(&publisher).unwrap_or_default();
        assert_eq!(actual, expected, "publisher {}", publisher);
    }
    assert!(seen.is_empty());
}

#[test]
fn many_publishers_lose_nothing() {
    let table = MemoryTable::new();
    let writer = ConcurrentMessageWriter::new(MessageTableWriter::message_table(
        table.clone(),
        SystemTimeProvider,
    ));
    let plan: Vec<Vec<usize>> = (0..8).map(|_| vec![3; 50]).collect();

    publish_all(&writer, &plan);
    writer.close().unwrap();

    let entries = table.entries();
    assert_eq!(entries.len(), 8 * 50 * 3);
    check_written(&entries, &plan);
    // Batching happened: fewer physical writes than requests
    assert!(table.write_sizes().len() <= 8 * 50);
}

#[test]
fn journal_backed_writer_persists_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.jsonl");
    let writer = ConcurrentMessageWriter::new(MessageTableWriter::message_table(
        JournalTable::open(&path, true).unwrap(),
        SystemTimeProvider,
    ));
    let plan: Vec<Vec<usize>> = (0..4).map(|_| vec![2; 10]).collect();

    publish_all(&writer, &plan);
    writer.close().unwrap();

    let entries = JournalReader::<MessageEntry>::open(&path)
        .read_valid()
        .unwrap();
    assert_eq!(entries.len(), 4 * 10 * 2);
    check_written(&entries, &plan);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn concurrent_publishes_keep_order_and_unique_positions(
        plan in proptest::collection::vec(
            proptest::collection::vec(1usize..6, 1..8),
            1..5,
        )
    ) {
        let table = MemoryTable::new();
        let writer = ConcurrentMessageWriter::new(MessageTableWriter::message_table(
            table.clone(),
            IncrementalTimeProvider::new(),
        ));

        publish_all(&writer, &plan);

        let entries = table.entries();
        let total: usize = plan.iter().flatten().sum();
        prop_assert_eq!(entries.len(), total);
        check_written(&entries, &plan);
    }
}
