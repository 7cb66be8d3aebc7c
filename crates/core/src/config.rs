// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration
//!
//! Loaded from a TOML file. Every field has a default, so a missing file or
//! a partial file is valid.
//!
//! ```toml
//! [writer]
//! stall_backoff = "1ms"
//! batch_capacity = 128
//!
//! [storage]
//! dir = "/var/lib/tms"
//! sync = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub writer: WriterConfig,
    pub storage: StorageConfig,
}

/// Tuning for the batched message writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Sleep between clock reads while waiting for the timestamp to advance
    /// after a timestamp's sequence ids are used up
    #[serde(with = "humantime_serde")]
    pub stall_backoff: Duration,
    /// Initial capacity of the buffer holding one drained batch
    pub batch_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            stall_backoff: Duration::from_millis(1),
            batch_capacity: 128,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the table journals
    pub dir: PathBuf,
    /// fsync after every physical write
    pub sync: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".tms"),
            sync: true,
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn message_journal(&self) -> PathBuf {
        self.storage.dir.join("messages.jsonl")
    }

    pub fn payload_journal(&self) -> PathBuf {
        self.storage.dir.join("payloads.jsonl")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
