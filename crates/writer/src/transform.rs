// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversion of publish requests into table entries

use crate::error::WriteError;
use tms_core::{MessageEntry, MessagePosition, PayloadEntry, PublishRequest};

/// What to write for a request that produced no payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyRequest {
    /// Write one entry without payload
    Reference,
    /// Write nothing; the request succeeds
    Skip,
}

/// Turns the payloads of a request into entries of one table type
pub trait RequestTransform: Send {
    type Entry;

    /// Decide how a request without payloads is handled
    ///
    /// An error fails that request only.
    fn on_empty(&self, request: &PublishRequest) -> Result<EmptyRequest, WriteError>;

    /// Build the entry for one payload (`None` for a reference entry)
    fn entry(
        &self,
        request: &PublishRequest,
        payload: Option<Vec<u8>>,
        position: MessagePosition,
    ) -> Self::Entry;
}

/// Builds message table entries
///
/// A transactional request without payloads becomes a single reference
/// entry pointing at data already stored in the payload table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTableTransform;

impl RequestTransform for MessageTableTransform {
    type Entry = MessageEntry;

    fn on_empty(&self, request: &PublishRequest) -> Result<EmptyRequest, WriteError> {
        if request.is_transactional() {
            Ok(EmptyRequest::Reference)
        } else {
            Err(WriteError::InvalidRequest {
                topic: request.topic().clone(),
                reason: "only transactional messages can have an empty payload".to_string(),
            })
        }
    }

    fn entry(
        &self,
        request: &PublishRequest,
        payload: Option<Vec<u8>>,
        position: MessagePosition,
    ) -> MessageEntry {
        MessageEntry {
            topic: request.topic().clone(),
            transactional: request.is_transactional(),
            transaction_write_pointer: request.transaction_write_pointer(),
            payload,
            publish_timestamp: position.timestamp,
            sequence_id: position.sequence_id,
        }
    }
}

/// Builds payload table entries for transactional publishes
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadTableTransform;

impl RequestTransform for PayloadTableTransform {
    type Entry = PayloadEntry;

    fn on_empty(&self, _request: &PublishRequest) -> Result<EmptyRequest, WriteError> {
        Ok(EmptyRequest::Skip)
    }

    fn entry(
        &self,
        request: &PublishRequest,
        payload: Option<Vec<u8>>,
        position: MessagePosition,
    ) -> PayloadEntry {
        PayloadEntry {
            topic: request.topic().clone(),
            transaction_write_pointer: request.transaction_write_pointer(),
            payload: payload.unwrap_or_default(),
            write_timestamp: position.timestamp,
            sequence_id: position.sequence_id,
        }
    }
}
