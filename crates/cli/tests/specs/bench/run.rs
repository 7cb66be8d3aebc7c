//! Bench specs

use crate::prelude::*;

#[test]
fn memory_bench_reports_totals() {
    let temp = Project::empty();
    temp.tms()
        .args(&["bench", "--memory", "--threads", "3", "--messages", "40", "--batch", "4"])
        .passes()
        .stdout_has("threads:         3")
        .stdout_has("requests:        30")
        .stdout_has("messages:        120")
        .stdout_has("physical writes:");
}

#[test]
fn journal_bench_writes_every_message() {
    let temp = Project::empty();
    temp.file("tms.toml", "[storage]\nsync = false\n");
    temp.tms()
        .args(&["--config", "tms.toml", "bench", "--threads", "2", "--messages", "25"])
        .passes()
        .stdout_has("messages:        50");

    let out = temp.tms().args(&["dump", "--topic", "bench:messages"]).passes();
    assert_eq!(out.json_lines().len(), 50);
}

#[test]
fn bench_rejects_bad_topic() {
    let temp = Project::empty();
    temp.tms()
        .args(&["bench", "--memory", "--topic", ":nothing"])
        .fails()
        .stderr_has("empty namespace or topic");
}
