//! CLI error specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();
    temp.tms().args(&["frobnicate"]).fails();
}

#[test]
fn topic_without_separator_is_rejected() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "events", "hello"])
        .fails()
        .stderr_has("missing ':' separator");
}

#[test]
fn empty_non_transactional_publish_is_invalid() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "ns:events"])
        .fails()
        .stderr_has("only transactional messages can have an empty payload");
}

#[test]
fn payload_table_requires_write_pointer() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--topic", "ns:events", "--payload-table", "a"])
        .fails();
}

#[test]
fn malformed_config_is_reported() {
    let temp = Project::empty();
    temp.file("tms.toml", "[writer]\nbatch_capacity = \"lots\"\n");
    temp.tms()
        .args(&["--config", "tms.toml", "dump"])
        .fails()
        .stderr_has("tms.toml");
}
