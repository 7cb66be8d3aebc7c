// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tms-writer: batched, concurrent message writing
//!
//! This crate provides:
//! - [`ConcurrentMessageWriter`]: lets many threads publish at once while
//!   only one of them at a time writes to the table, covering every queued
//!   request in one physical write
//! - [`PublishRequestWriter`]: turns a batch of requests into entries and
//!   stores them in sub-writes bounded by the sequence id space
//! - [`TimeSequenceProvider`]: unique `(timestamp, sequence_id)` positions

pub mod concurrent;
pub mod error;
pub mod pending;
pub mod request_writer;
pub mod sequence;
pub mod transform;

pub use concurrent::ConcurrentMessageWriter;
pub use error::WriteError;
pub use pending::{Completion, PendingStoreRequest, WriteReceipt};
pub use request_writer::{PublishRequestWriter, RequestWriter};
pub use sequence::{TimeSequenceProvider, SEQUENCE_ID_LIMIT};
pub use transform::{EmptyRequest, MessageTableTransform, PayloadTableTransform, RequestTransform};

/// Writer for the message table
pub type MessageTableWriter<T, C> = PublishRequestWriter<T, MessageTableTransform, C>;

/// Writer for the payload table
pub type PayloadTableWriter<T, C> = PublishRequestWriter<T, PayloadTableTransform, C>;
