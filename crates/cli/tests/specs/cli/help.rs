//! Help output specs

use crate::prelude::*;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    Command::new(env!("CARGO_BIN_EXE_tms"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bench"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("dump"));
}

#[test]
fn publish_help_shows_transaction_flag() {
    let temp = Project::empty();
    temp.tms()
        .args(&["publish", "--help"])
        .passes()
        .stdout_has("--tx")
        .stdout_has("--topic");
}

#[test]
fn version_flag_prints_version() {
    Command::new(env!("CARGO_BIN_EXE_tms"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("tms "));
}
