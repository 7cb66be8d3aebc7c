// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tms-core: shared data model for the topic messaging store
//!
//! This crate provides:
//! - Topic identifiers and publish requests
//! - Message and payload table records
//! - The wall-clock abstraction used to stamp writes
//! - TOML configuration

pub mod clock;
pub mod config;
pub mod entry;
pub mod request;
pub mod topic;

pub use clock::{FakeTimeProvider, IncrementalTimeProvider, SystemTimeProvider, TimeProvider};
pub use config::{Config, ConfigError, StorageConfig, WriterConfig};
pub use entry::{MessageEntry, MessagePosition, PayloadEntry, TableEntry};
pub use request::PublishRequest;
pub use topic::{TopicId, TopicIdError};
