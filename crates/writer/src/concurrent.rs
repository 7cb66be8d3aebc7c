// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent, batching front end of a request writer
//!
//! Publishing threads never block on a lock. Each one:
//!
//! 1. Wraps its request in a [`PendingStoreRequest`] and pushes it onto a
//!    lock-free queue.
//! 2. Tries to flip the writer flag from false to true.
//! 3. If it won, drains a snapshot of the queue, writes the whole snapshot
//!    with the request writer, completes every drained request and clears the
//!    flag.
//! 4. Repeats from 2 until its own request is completed, yielding the
//!    processor after every lost attempt.
//!
//! The winner of step 2 has exclusive use of the request writer until it
//! clears the flag, so many publishers share one physical write.

use crate::error::WriteError;
use crate::pending::{PendingStoreRequest, WriteReceipt};
use crate::request_writer::RequestWriter;
use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tms_core::PublishRequest;
use tms_storage::StoreError;

/// Holds the writer flag; clears it when dropped, including on unwind
struct Election<'a> {
    flag: &'a AtomicBool,
}

impl<'a> Election<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag })
    }

    fn acquire(flag: &'a AtomicBool) -> Self {
        loop {
            if let Some(election) = Self::try_acquire(flag) {
                return election;
            }
            thread::yield_now();
        }
    }
}

impl Drop for Election<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// State reachable only by the elected thread
struct WriterState<W> {
    writer: W,
    inflight: Vec<PendingStoreRequest>,
    closed: bool,
}

impl<W: RequestWriter> WriterState<W> {
    /// Write everything queued up to now
    fn flush(&mut self, queue: &SegQueue<PendingStoreRequest>) -> Result<(), Arc<StoreError>> {
        // A snapshot rather than a live view, so requests that keep arriving
        // cannot hold one writer forever
        for _ in 0..queue.len() {
            match queue.pop() {
                Some(pending) => self.inflight.push(pending),
                None => break,
            }
        }
        if self.inflight.is_empty() {
            return Ok(());
        }

        if self.closed {
            tracing::debug!(requests = self.inflight.len(), "rejecting requests queued after close");
            for pending in self.inflight.drain(..) {
                pending.fail(WriteError::Closed);
            }
            return Ok(());
        }

        tracing::trace!(requests = self.inflight.len(), "writing batch");
        let result = self.writer.write(&mut self.inflight);

        // The request writer settles what it can; whatever it left pending
        // shares the fate of the batch
        for pending in self.inflight.drain(..) {
            match &result {
                Ok(()) => pending.succeed(),
                Err(cause) => pending.fail(WriteError::storage(pending.topic(), cause)),
            };
        }
        result
    }
}

/// Thread-safe writer that batches concurrent publishes
pub struct ConcurrentMessageWriter<W> {
    writer_flag: AtomicBool,
    closed: AtomicBool,
    queue: SegQueue<PendingStoreRequest>,
    state: Mutex<WriterState<W>>,
}

impl<W: RequestWriter> ConcurrentMessageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 128)
    }

    /// `capacity` sizes the buffer that holds one drained batch
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer_flag: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            queue: SegQueue::new(),
            state: Mutex::new(WriterState {
                writer,
                inflight: Vec::with_capacity(capacity),
                closed: false,
            }),
        }
    }

    /// Persist a request, returning once it is written or has failed
    ///
    /// The calling thread may end up writing other threads' requests as
    /// well as its own.
    pub fn persist(&self, request: PublishRequest) -> Result<WriteReceipt, WriteError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(WriteError::Closed);
        }

        let (pending, completion) = PendingStoreRequest::new(request);
        self.queue.push(pending);

        // TODO: back off exponentially under heavy contention instead of
        // yielding on every lost election
        loop {
            if let Some(result) = completion.result() {
                return result.clone();
            }
            if !self.try_write() {
                thread::yield_now();
            }
        }
    }

    fn try_write(&self) -> bool {
        let Some(_election) = Election::try_acquire(&self.writer_flag) else {
            return false;
        };
        // Errors reach each publisher through its own completion
        let _ = self.lock_state().flush(&self.queue);
        true
    }

    /// Only called while holding the election, so never contended
    fn lock_state(&self) -> MutexGuard<'_, WriterState<W>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flush queued requests and close the request writer
    ///
    /// Only the first call does anything. The request writer is closed even
    /// if the final flush fails; a flush failure takes precedence in the
    /// result.
    pub fn close(&self) -> Result<(), WriteError> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        let _election = Election::acquire(&self.writer_flag);
        let mut state = self.lock_state();
        let flushed = state.flush(&self.queue);
        state.closed = true;
        let closed = state.writer.close();
        tracing::info!(flush_ok = flushed.is_ok(), close_ok = closed.is_ok(), "message writer closed");

        flushed.map_err(WriteError::Flush)?;
        closed.map_err(|e| WriteError::CloseTable(Arc::new(e)))
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Requests queued and not yet drained by a writer
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
#[path = "concurrent_tests.rs"]
mod tests;
