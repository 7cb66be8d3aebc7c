// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory table for tests and benchmarks

use crate::table::{StorageTable, StoreError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

struct MemoryState<E> {
    entries: Vec<E>,
    write_sizes: Vec<usize>,
    failures: VecDeque<String>,
    closed: bool,
}

/// Table that keeps every stored entry in memory
///
/// Clones share state, so a test can hand one clone to the writer and keep
/// another to inspect what was written.
pub struct MemoryTable<E> {
    state: Arc<Mutex<MemoryState<E>>>,
}

impl<E> Clone for MemoryTable<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E> Default for MemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> MemoryTable<E> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                entries: Vec::new(),
                write_sizes: Vec::new(),
                failures: VecDeque::new(),
                closed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState<E>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next `store` call fail after consuming its entries
    ///
    /// Calls queue up: each pending failure is used by exactly one store.
    pub fn fail_next_store(&self, reason: impl Into<String>) {
        self.lock().failures.push_back(reason.into());
    }

    /// Number of entries in each successful physical write, in order
    pub fn write_sizes(&self) -> Vec<usize> {
        self.lock().write_sizes.clone()
    }

    /// Number of entries in the most recent successful physical write
    pub fn last_write_count(&self) -> Option<usize> {
        self.lock().write_sizes.last().copied()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl<E: Clone> MemoryTable<E> {
    /// Snapshot of every stored entry in write order
    pub fn entries(&self) -> Vec<E> {
        self.lock().entries.clone()
    }
}

impl<E: Send> StorageTable for MemoryTable<E> {
    type Entry = E;

    fn store(&mut self, entries: &mut dyn Iterator<Item = E>) -> Result<(), StoreError> {
        // Pull the batch before taking the lock; producing entries may be slow.
        let batch: Vec<E> = entries.collect();

        let mut state = self.lock();
        if state.closed {
            return Err(StoreError::Closed);
        }
        if let Some(reason) = state.failures.pop_front() {
            return Err(StoreError::Injected(reason));
        }
        state.write_sizes.push(batch.len());
        state.entries.extend(batch);
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.lock().closed = true;
        Ok(())
    }
}
