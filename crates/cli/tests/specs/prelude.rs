//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// A scratch directory the CLI runs in; journals land under `.tms/`
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root
    pub fn file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(path, content).expect("write file");
    }

    pub fn tms(&self) -> Cli {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tms"));
        cmd.current_dir(self.dir.path()).env("RUST_LOG", "warn");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require exit code 0
    pub fn passes(mut self) -> Output {
        let output = self.cmd.output().expect("run tms");
        let out = Output::from(output);
        assert!(out.success, "expected success\nstdout:\n{}\nstderr:\n{}", out.stdout, out.stderr);
        out
    }

    /// Run and require a non-zero exit code
    pub fn fails(mut self) -> Output {
        let output = self.cmd.output().expect("run tms");
        let out = Output::from(output);
        assert!(!out.success, "expected failure\nstdout:\n{}\nstderr:\n{}", out.stdout, out.stderr);
        out
    }
}

pub struct Output {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {:?}:\n{}", needle, self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {:?}:\n{}", needle, self.stderr);
        self
    }

    /// Stdout parsed as one JSON value per line
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }
}
