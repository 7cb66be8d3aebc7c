// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable journal-backed table
//!
//! Entries are appended as newline-delimited JSON records, each carrying a
//! CRC32 of its serialized entry:
//!
//! ```text
//! store(entries) → JournalRecord per entry → one buffer → write_all → fsync
//!                                                              ↓
//!                                   JournalReader → valid prefix of records
//! ```
//!
//! A whole `store` call is written with a single `write_all`, so a crash
//! leaves at most one torn batch at the tail. Readers stop at the first
//! truncated or checksum-mismatched line; [`JournalTable::repair`] cuts the
//! file back to the last valid record.

use crate::table::{StorageTable, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One line of the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord<E> {
    pub entry: E,
    pub checksum: u32,
}

impl<E: Serialize> JournalRecord<E> {
    pub fn new(entry: E) -> Result<Self, serde_json::Error> {
        let checksum = checksum_of(&entry)?;
        Ok(Self { entry, checksum })
    }

    /// Check the stored checksum against the entry
    pub fn verify(&self) -> bool {
        checksum_of(&self.entry).is_ok_and(|c| c == self.checksum)
    }
}

fn checksum_of<E: Serialize>(entry: &E) -> Result<u32, serde_json::Error> {
    let json = serde_json::to_vec(entry)?;
    Ok(crc32fast::hash(&json))
}

/// Append-only table persisted as a journal file
pub struct JournalTable<E> {
    path: PathBuf,
    file: Option<File>,
    sync: bool,
    records_written: u64,
    bytes_written: u64,
    _entry: PhantomData<fn(E)>,
}

impl<E> JournalTable<E> {
    /// Open or create a journal, creating parent directories as needed
    ///
    /// With `sync` set, every `store` is fsync'd before it returns.
    pub fn open(path: &Path, sync: bool) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            sync,
            records_written: 0,
            bytes_written: 0,
            _entry: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended since open
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Bytes appended since open
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl<E: DeserializeOwned + Serialize> JournalTable<E> {
    /// Truncate a journal at its first invalid record
    ///
    /// Returns the number of bytes removed. Meant for explicit crash
    /// recovery; opening a table never truncates on its own.
    pub fn repair(path: &Path) -> Result<u64, StoreError> {
        let len = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut records = JournalReader::<E>::open(path).records()?;
        for record in records.by_ref() {
            if let Err(e) = record {
                tracing::warn!(path = %path.display(), error = %e, "journal corruption found");
                break;
            }
        }
        let valid = records.last_valid_position();
        if valid >= len {
            return Ok(0);
        }

        let file = OpenOptions::new().write(true).open(path)?;
        file.set_len(valid)?;
        file.sync_all()?;
        tracing::info!(path = %path.display(), position = valid, "journal truncated at corruption point");
        Ok(len - valid)
    }
}

impl<E: Serialize + Send> StorageTable for JournalTable<E> {
    type Entry = E;

    fn store(&mut self, entries: &mut dyn Iterator<Item = E>) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let mut count = 0u64;
        for entry in entries {
            serde_json::to_writer(&mut buf, &JournalRecord::new(entry)?)?;
            buf.push(b'\n');
            count += 1;
        }

        let file = self.file.as_mut().ok_or(StoreError::Closed)?;
        if buf.is_empty() {
            return Ok(());
        }
        file.write_all(&buf)?;
        if self.sync {
            file.sync_data()?;
        }

        self.records_written += count;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        Ok(())
    }
}

/// Errors that can occur when reading journal records
#[derive(Debug, Error)]
pub enum JournalReadError {
    #[error("corrupted record at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
    #[error("checksum mismatch at line {line}")]
    ChecksumMismatch { line: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Reader over the valid prefix of a journal
pub struct JournalReader<E> {
    path: PathBuf,
    _entry: PhantomData<fn() -> E>,
}

impl<E: DeserializeOwned + Serialize> JournalReader<E> {
    /// A missing file reads as an empty journal
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            _entry: PhantomData,
        }
    }

    /// Iterate records, yielding an error at the first corrupted line
    pub fn records(&self) -> Result<JournalIter<E>, JournalReadError> {
        let reader = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(JournalIter {
            reader,
            line_number: 0,
            last_valid_position: 0,
            failed: false,
            _entry: PhantomData,
        })
    }

    /// All entries up to the first corrupted line
    pub fn read_valid(&self) -> Result<Vec<E>, JournalReadError> {
        let mut entries = Vec::new();
        for record in self.records()? {
            match record {
                Ok(entry) => entries.push(entry),
                Err(JournalReadError::Io(e)) => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "stopping journal read");
                    break;
                }
            }
        }
        Ok(entries)
    }
}

/// Iterator over journal entries with position tracking
pub struct JournalIter<E> {
    reader: Option<BufReader<File>>,
    line_number: u64,
    last_valid_position: u64,
    failed: bool,
    _entry: PhantomData<fn() -> E>,
}

impl<E> JournalIter<E> {
    /// Byte offset just past the last valid record read so far
    pub fn last_valid_position(&self) -> u64 {
        self.last_valid_position
    }
}

impl<E: DeserializeOwned + Serialize> Iterator for JournalIter<E> {
    type Item = Result<E, JournalReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let reader = self.reader.as_mut()?;

        // Bytes rather than a String: a torn tail may end inside a UTF-8
        // sequence, which is corruption and not an IO failure
        let mut line = Vec::new();
        let read = match reader.read_until(b'\n', &mut line) {
            Ok(0) => return None,
            Ok(n) => n,
            Err(e) => {
                self.failed = true;
                return Some(Err(e.into()));
            }
        };
        self.line_number += 1;

        // A record without its newline is a torn write
        if line.pop() != Some(b'\n') {
            self.failed = true;
            return Some(Err(JournalReadError::Corrupted {
                line: self.line_number,
                reason: "truncated record".to_string(),
            }));
        }

        let record: JournalRecord<E> = match serde_json::from_slice(&line) {
            Ok(record) => record,
            Err(e) => {
                self.failed = true;
                return Some(Err(JournalReadError::Corrupted {
                    line: self.line_number,
                    reason: e.to_string(),
                }));
            }
        };
        if !record.verify() {
            self.failed = true;
            return Some(Err(JournalReadError::ChecksumMismatch {
                line: self.line_number,
            }));
        }

        self.last_valid_position = reader
            .stream_position()
            .unwrap_or(self.last_valid_position + read as u64);
        Some(Ok(record.entry))
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
