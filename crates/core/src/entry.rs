// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage table records
//!
//! Every payload pulled off a [`PublishRequest`](crate::PublishRequest) becomes
//! exactly one entry stamped with a [`MessagePosition`]. Within one
//! timestamp the 16-bit sequence id is strictly increasing in write order.

use crate::topic::TopicId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Write timestamp plus sequence id, unique per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessagePosition {
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub sequence_id: u16,
}

impl MessagePosition {
    pub fn new(timestamp: u64, sequence_id: u16) -> Self {
        Self {
            timestamp,
            sequence_id,
        }
    }
}

impl fmt::Display for MessagePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.timestamp, self.sequence_id)
    }
}

/// A record in the message table
///
/// A transactional publish with no payloads is recorded as a single entry
/// without payload, referring to data held in the payload table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub topic: TopicId,
    pub transactional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_write_pointer: Option<u64>,
    #[serde(default)]
    pub payload: Option<Vec<u8>>,
    pub publish_timestamp: u64,
    pub sequence_id: u16,
}

impl MessageEntry {
    pub fn is_payload_reference(&self) -> bool {
        self.payload.is_none()
    }

    pub fn position(&self) -> MessagePosition {
        MessagePosition::new(self.publish_timestamp, self.sequence_id)
    }
}

/// A record in the payload table, written for transactional publishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEntry {
    pub topic: TopicId,
    pub transaction_write_pointer: Option<u64>,
    pub payload: Vec<u8>,
    pub write_timestamp: u64,
    pub sequence_id: u16,
}

impl PayloadEntry {
    pub fn position(&self) -> MessagePosition {
        MessagePosition::new(self.write_timestamp, self.sequence_id)
    }
}

/// Common view over table records, used by tools that inspect tables
pub trait TableEntry {
    fn topic(&self) -> &TopicId;
    fn position(&self) -> MessagePosition;
    fn payload(&self) -> Option<&[u8]>;
}

impl TableEntry for MessageEntry {
    fn topic(&self) -> &TopicId {
        &self.topic
    }

    fn position(&self) -> MessagePosition {
        MessageEntry::position(self)
    }

    fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}

impl TableEntry for PayloadEntry {
    fn topic(&self) -> &TopicId {
        &self.topic
    }

    fn position(&self) -> MessagePosition {
        PayloadEntry::position(self)
    }

    fn payload(&self) -> Option<&[u8]> {
        Some(&self.payload)
    }
}
