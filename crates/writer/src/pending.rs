// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending store requests and their completion state
//!
//! ```text
//! PENDING ──write ok──▶ COMPLETED (success)
//!    │
//!    └──write failed / invalid──▶ COMPLETED (failure)
//! ```
//!
//! The elected writer owns the [`PendingStoreRequest`] once it has drained
//! it from the queue; the publishing thread keeps only the shared
//! [`Completion`] and polls it. A completion is set at most once.

use crate::error::WriteError;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tms_core::{MessagePosition, PublishRequest, TopicId};

/// Where a successful publish landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReceipt {
    pub topic: TopicId,
    /// Number of entries written
    pub entries: u64,
    /// Position of the first entry, `None` when nothing was written
    pub first: Option<MessagePosition>,
    /// Position of the last entry
    pub last: Option<MessagePosition>,
}

/// Terminal state of a pending request, shared with its publisher
#[derive(Debug, Default)]
pub struct Completion {
    result: OnceLock<Result<WriteReceipt, WriteError>>,
}

impl Completion {
    pub fn is_completed(&self) -> bool {
        self.result.get().is_some()
    }

    /// The outcome, or `None` while still pending
    pub fn result(&self) -> Option<&Result<WriteReceipt, WriteError>> {
        self.result.get()
    }

    /// Returns false if the request was already completed
    fn complete(&self, result: Result<WriteReceipt, WriteError>) -> bool {
        self.result.set(result).is_ok()
    }
}

/// A publish request waiting to be written by the elected writer
pub struct PendingStoreRequest {
    request: PublishRequest,
    lookahead: Option<Vec<u8>>,
    exhausted: bool,
    entries: u64,
    first: Option<MessagePosition>,
    last: Option<MessagePosition>,
    completion: Arc<Completion>,
}

impl PendingStoreRequest {
    pub fn new(request: PublishRequest) -> (Self, Arc<Completion>) {
        let completion = Arc::new(Completion::default());
        let pending = Self {
            request,
            lookahead: None,
            exhausted: false,
            entries: 0,
            first: None,
            last: None,
            completion: Arc::clone(&completion),
        };
        (pending, completion)
    }

    pub fn request(&self) -> &PublishRequest {
        &self.request
    }

    pub fn topic(&self) -> &TopicId {
        self.request.topic()
    }

    /// Whether another payload is available, pulling it if needed
    ///
    /// Once the payload stream has ended it is never polled again.
    pub(crate) fn has_payload(&mut self) -> bool {
        if self.lookahead.is_none() && !self.exhausted {
            self.lookahead = self.request.next();
            self.exhausted = self.lookahead.is_none();
        }
        self.lookahead.is_some()
    }

    /// Take the next payload; `None` once the stream has ended
    pub(crate) fn take_payload(&mut self) -> Option<Vec<u8>> {
        if self.has_payload() {
            self.lookahead.take()
        } else {
            None
        }
    }

    /// Note that an entry of this request was assigned `position`
    pub(crate) fn record(&mut self, position: MessagePosition) {
        self.entries += 1;
        self.first.get_or_insert(position);
        self.last = Some(position);
    }

    /// Entries produced from this request so far
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn first_position(&self) -> Option<MessagePosition> {
        self.first
    }

    pub fn last_position(&self) -> Option<MessagePosition> {
        self.last
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    pub fn receipt(&self) -> WriteReceipt {
        WriteReceipt {
            topic: self.topic().clone(),
            entries: self.entries,
            first: self.first,
            last: self.last,
        }
    }

    pub(crate) fn succeed(&self) -> bool {
        self.completion.complete(Ok(self.receipt()))
    }

    pub(crate) fn fail(&self, err: WriteError) -> bool {
        self.completion.complete(Err(err))
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
