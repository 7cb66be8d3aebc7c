// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tms-storage: append-only tables behind the message writer
//!
//! A [`StorageTable`] accepts an ordered stream of entries and persists it as
//! one unit. Two implementations are provided:
//! - [`MemoryTable`] keeps entries in memory and can inject failures
//! - [`JournalTable`] appends checksummed JSON lines to a file

pub mod journal;
pub mod memory;
pub mod table;

pub use journal::{JournalReadError, JournalReader, JournalRecord, JournalTable};
pub use memory::MemoryTable;
pub use table::{StorageTable, StoreError};
