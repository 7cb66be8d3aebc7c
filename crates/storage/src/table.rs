// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The storage collaborator seam

use std::io;
use thiserror::Error;

/// Errors that can occur while storing entries
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("journal read error: {0}")]
    Read(#[from] crate::journal::JournalReadError),
    #[error("table is closed")]
    Closed,
    #[error("injected failure: {0}")]
    Injected(String),
}

/// An append-only table of entries
///
/// `store` must consume `entries` in the order presented and either persist
/// all of them or fail the whole call. Implementations are driven by one
/// thread at a time and need no internal synchronization.
pub trait StorageTable: Send {
    type Entry;

    fn store(&mut self, entries: &mut dyn Iterator<Item = Self::Entry>)
        -> Result<(), StoreError>;

    fn close(&mut self) -> Result<(), StoreError>;
}

impl<T: StorageTable + ?Sized> StorageTable for Box<T> {
    type Entry = T::Entry;

    fn store(
        &mut self,
        entries: &mut dyn Iterator<Item = Self::Entry>,
    ) -> Result<(), StoreError> {
        (**self).store(entries)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        (**self).close()
    }
}
