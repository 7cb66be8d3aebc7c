// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction for write timestamps
//!
//! Timestamps are milliseconds since the Unix epoch. Tests swap in
//! [`IncrementalTimeProvider`] or [`FakeTimeProvider`] to make the
//! timestamp assigned to each physical write predictable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of the current time in milliseconds
pub trait TimeProvider: Send + Sync {
    fn current_time_millis(&self) -> u64;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn current_time_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Returns 0, 1, 2, ... on successive reads
///
/// Clones share the counter.
#[derive(Clone, Debug, Default)]
pub struct IncrementalTimeProvider {
    next: Arc<AtomicU64>,
}

impl IncrementalTimeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from the given timestamp
    pub fn starting_at(millis: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(millis)),
        }
    }
}

impl TimeProvider for IncrementalTimeProvider {
    fn current_time_millis(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug, Default)]
pub struct FakeTimeProvider {
    current: Arc<AtomicU64>,
}

impl FakeTimeProvider {
    pub fn new(millis: u64) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        self.current
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    /// Set the clock to a specific timestamp, which may move it backwards
    pub fn set(&self, millis: u64) {
        self.current.store(millis, Ordering::SeqCst);
    }
}

impl TimeProvider for FakeTimeProvider {
    fn current_time_millis(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for Arc<T> {
    fn current_time_millis(&self) -> u64 {
        (**self).current_time_millis()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
