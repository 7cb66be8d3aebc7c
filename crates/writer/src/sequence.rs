// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write timestamp and sequence id assignment
//!
//! Every entry gets a `(timestamp, sequence_id)` pair. The sequence id is
//! 16 bits wide, so at most [`SEQUENCE_ID_LIMIT`] entries can share one
//! timestamp; once they are used up, [`TimeSequenceProvider::update`] waits
//! for the clock to move on.
//!
//! The provider is not synchronized. It is owned by the request writer, which
//! only the elected writer thread can reach.

use std::time::Duration;
use tms_core::{MessagePosition, TimeProvider};

/// Number of distinct sequence ids per timestamp (ids are `0..=0xFFFF`)
pub const SEQUENCE_ID_LIMIT: u32 = 0x10000;

/// Default sleep while waiting for the clock to advance
pub const DEFAULT_STALL_BACKOFF: Duration = Duration::from_millis(1);

pub struct TimeSequenceProvider<C> {
    clock: C,
    stall_backoff: Duration,
    write_timestamp: u64,
    last_write_timestamp: Option<u64>,
    sequence_id: u32,
}

impl<C: TimeProvider> TimeSequenceProvider<C> {
    pub fn new(clock: C) -> Self {
        Self::with_stall_backoff(clock, DEFAULT_STALL_BACKOFF)
    }

    pub fn with_stall_backoff(clock: C, stall_backoff: Duration) -> Self {
        Self {
            clock,
            stall_backoff,
            write_timestamp: 0,
            last_write_timestamp: None,
            sequence_id: 0,
        }
    }

    /// Refresh the write timestamp from the clock
    ///
    /// The sequence id resets to 0 whenever the timestamp changes. If every
    /// sequence id of the current timestamp is used, this sleeps until the
    /// clock advances. A clock reading behind the last write timestamp is
    /// treated as the last write timestamp, so positions never repeat.
    pub fn update(&mut self) {
        let mut now = self.read_clock();
        while Some(now) == self.last_write_timestamp && self.sequence_id >= SEQUENCE_ID_LIMIT {
            tracing::trace!(timestamp = now, "sequence ids exhausted, waiting for clock");
            std::thread::sleep(self.stall_backoff);
            now = self.read_clock();
        }

        self.write_timestamp = now;
        if self.last_write_timestamp != Some(now) {
            self.last_write_timestamp = Some(now);
            self.sequence_id = 0;
        }
    }

    fn read_clock(&self) -> u64 {
        let now = self.clock.current_time_millis();
        match self.last_write_timestamp {
            Some(last) if now < last => last,
            _ => now,
        }
    }

    pub fn write_timestamp(&self) -> u64 {
        self.write_timestamp
    }

    /// Next sequence id to be handed out; `SEQUENCE_ID_LIMIT` when exhausted
    pub fn sequence_id(&self) -> u32 {
        self.sequence_id
    }

    /// Sequence ids left at the current timestamp
    pub fn remaining(&self) -> u32 {
        SEQUENCE_ID_LIMIT.saturating_sub(self.sequence_id)
    }

    /// Hand out the next sequence id
    ///
    /// Callers must not take more than [`remaining`](Self::remaining) ids
    /// between updates.
    pub fn get_and_increment_sequence_id(&mut self) -> u16 {
        debug_assert!(self.sequence_id < SEQUENCE_ID_LIMIT);
        let id = self.sequence_id as u16;
        self.sequence_id += 1;
        id
    }

    /// Position for the next entry
    pub fn next_position(&mut self) -> MessagePosition {
        let sequence_id = self.get_and_increment_sequence_id();
        MessagePosition::new(self.write_timestamp, sequence_id)
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
