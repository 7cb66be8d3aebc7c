// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writing drained batches to a storage table
//!
//! [`PublishRequestWriter`] turns a batch of pending requests into one lazy
//! stream of entries and stores it. Sequence ids are 16 bits per timestamp,
//! so the stream is cut into sub-writes of at most the remaining sequence
//! budget; the timestamp is refreshed before each sub-write.
//!
//! ```text
//! batch: [r1: a b c] [r2: d e] [r3: f]
//!                 │
//!                 ▼  (budget 4 at timestamp T)
//! store #1: a@T.65532 b@T.65533 c@T.65534 d@T.65535
//! store #2: e@T'.0 f@T'.1
//! ```
//!
//! A request succeeds when the sub-write holding its last entry succeeds.
//! A failed sub-write fails every request with an entry in it; the rest of a
//! failed request is skipped and later requests go on in the next sub-write.

use crate::error::WriteError;
use crate::pending::PendingStoreRequest;
use crate::sequence::TimeSequenceProvider;
use crate::transform::{EmptyRequest, MessageTableTransform, PayloadTableTransform, RequestTransform};
use std::io;
use std::sync::Arc;
use tms_core::{TimeProvider, WriterConfig};
use tms_storage::{StorageTable, StoreError};

/// Writes batches of pending requests
///
/// Not thread-safe: callers must guarantee exclusive access, which the
/// concurrent writer does through writer election.
pub trait RequestWriter: Send {
    /// Write a drained batch
    ///
    /// Implementations complete the requests they can; any request left
    /// pending is completed by the caller from the returned result, which
    /// carries the first storage failure of the batch.
    fn write(&mut self, batch: &mut [PendingStoreRequest]) -> Result<(), Arc<StoreError>>;

    fn close(&mut self) -> Result<(), StoreError>;
}

/// Request writer for one storage table
pub struct PublishRequestWriter<T, X, C> {
    table: T,
    transform: X,
    sequence: TimeSequenceProvider<C>,
}

impl<T, C> PublishRequestWriter<T, MessageTableTransform, C>
where
    T: StorageTable<Entry = tms_core::MessageEntry>,
    C: TimeProvider,
{
    pub fn message_table(table: T, clock: C) -> Self {
        Self::new(table, MessageTableTransform, clock)
    }
}

impl<T, C> PublishRequestWriter<T, PayloadTableTransform, C>
where
    T: StorageTable<Entry = tms_core::PayloadEntry>,
    C: TimeProvider,
{
    pub fn payload_table(table: T, clock: C) -> Self {
        Self::new(table, PayloadTableTransform, clock)
    }
}

impl<T, X, C> PublishRequestWriter<T, X, C>
where
    T: StorageTable,
    X: RequestTransform<Entry = T::Entry>,
    C: TimeProvider,
{
    pub fn new(table: T, transform: X, clock: C) -> Self {
        Self {
            table,
            transform,
            sequence: TimeSequenceProvider::new(clock),
        }
    }

    pub fn with_config(table: T, transform: X, clock: C, config: &WriterConfig) -> Self {
        Self {
            table,
            transform,
            sequence: TimeSequenceProvider::with_stall_backoff(clock, config.stall_backoff),
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T, X, C> RequestWriter for PublishRequestWriter<T, X, C>
where
    T: StorageTable,
    X: RequestTransform<Entry = T::Entry>,
    C: TimeProvider,
{
    fn write(&mut self, batch: &mut [PendingStoreRequest]) -> Result<(), Arc<StoreError>> {
        let mut stream = EntryStream::new(batch, &self.transform);
        let mut first_failure = None;

        while stream.has_next() {
            self.sequence.update();
            let timestamp = self.sequence.write_timestamp();
            let budget = self.sequence.remaining();

            let mut sub_write = SubWrite {
                stream: &mut stream,
                sequence: &mut self.sequence,
                budget,
            };
            let result = self.table.store(&mut sub_write);
            let written = stream.chunk_len;

            let failure = match result {
                Ok(()) => {
                    tracing::debug!(entries = written, timestamp, "physical write complete");
                    stream.commit_chunk();
                    None
                }
                Err(e) => {
                    let cause = Arc::new(e);
                    tracing::warn!(entries = written, timestamp, error = %cause, "physical write failed");
                    stream.fail_chunk(&cause);
                    Some(cause)
                }
            };

            if written == 0 {
                // The table took nothing; retrying would spin forever
                let cause = failure.clone().unwrap_or_else(|| {
                    Arc::new(StoreError::Io(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "storage table consumed no entries",
                    )))
                });
                stream.fail_remaining(&cause);
                first_failure.get_or_insert(cause);
                break;
            }
            if let Some(cause) = failure {
                first_failure.get_or_insert(cause);
            }
        }

        match first_failure {
            Some(cause) => Err(cause),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.table.close()
    }
}

/// Lazy entries over a batch, tracking which requests the current
/// sub-write touched
struct EntryStream<'a, X> {
    batch: &'a mut [PendingStoreRequest],
    transform: &'a X,
    cursor: usize,
    chunk: Option<(usize, usize)>,
    chunk_len: usize,
}

impl<'a, X: RequestTransform> EntryStream<'a, X> {
    fn new(batch: &'a mut [PendingStoreRequest], transform: &'a X) -> Self {
        Self {
            batch,
            transform,
            cursor: 0,
            chunk: None,
            chunk_len: 0,
        }
    }

    /// Move to the next request with an entry to produce
    ///
    /// Empty requests are settled here without producing entries.
    fn has_next(&mut self) -> bool {
        while let Some(pending) = self.batch.get_mut(self.cursor) {
            if !pending.is_completed() {
                if pending.has_payload() {
                    return true;
                }
                if pending.entries() == 0 {
                    match self.transform.on_empty(pending.request()) {
                        Ok(EmptyRequest::Reference) => return true,
                        Ok(EmptyRequest::Skip) => {
                            pending.succeed();
                        }
                        Err(e) => {
                            tracing::warn!(topic = %pending.topic(), error = %e, "rejecting publish request");
                            pending.fail(e);
                        }
                    }
                }
            }
            self.cursor += 1;
        }
        false
    }

    /// Produce the entry at the cursor; `has_next` must have returned true
    fn next_entry<C: TimeProvider>(
        &mut self,
        sequence: &mut TimeSequenceProvider<C>,
    ) -> Option<X::Entry> {
        let index = self.cursor;
        let pending = self.batch.get_mut(index)?;
        let payload = pending.take_payload();
        let position = sequence.next_position();
        let entry = self.transform.entry(pending.request(), payload, position);
        pending.record(position);

        self.chunk = Some(match self.chunk {
            Some((first, _)) => (first, index),
            None => (index, index),
        });
        self.chunk_len += 1;
        Some(entry)
    }

    fn take_chunk(&mut self) -> std::ops::Range<usize> {
        self.chunk_len = 0;
        match self.chunk.take() {
            Some((first, last)) => first..last + 1,
            None => 0..0,
        }
    }

    /// The sub-write was stored: complete requests whose last entry was in it
    fn commit_chunk(&mut self) {
        let cursor = self.cursor;
        for index in self.take_chunk() {
            if let Some(pending) = self.batch.get_mut(index) {
                if pending.is_completed() {
                    continue;
                }
                if index < cursor || !pending.has_payload() {
                    pending.succeed();
                }
            }
        }
    }

    /// The sub-write failed: fail every request with an entry in it
    fn fail_chunk(&mut self, cause: &Arc<StoreError>) {
        for index in self.take_chunk() {
            if let Some(pending) = self.batch.get(index) {
                pending.fail(WriteError::storage(pending.topic(), cause));
            }
        }
    }

    fn fail_remaining(&mut self, cause: &Arc<StoreError>) {
        for pending in self.batch.iter().skip(self.cursor) {
            pending.fail(WriteError::storage(pending.topic(), cause));
        }
    }
}

/// One physical write: at most `budget` entries from the stream
struct SubWrite<'s, 'a, X, C> {
    stream: &'s mut EntryStream<'a, X>,
    sequence: &'s mut TimeSequenceProvider<C>,
    budget: u32,
}

impl<X: RequestTransform, C: TimeProvider> Iterator for SubWrite<'_, '_, X, C> {
    type Item = X::Entry;

    fn next(&mut self) -> Option<X::Entry> {
        if self.budget == 0 || !self.stream.has_next() {
            return None;
        }
        self.budget -= 1;
        self.stream.next_entry(self.sequence)
    }
}

#[cfg(test)]
#[path = "request_writer_tests.rs"]
mod tests;
