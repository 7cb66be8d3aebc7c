// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish requests
//!
//! A [`PublishRequest`] is one caller's publish call: a topic, optional
//! transaction context, and a lazy stream of raw payloads. The stream is
//! pulled by whichever thread ends up writing the request, so it must be
//! `Send`. It is forward-only and cannot be restarted.

use crate::topic::TopicId;
use std::fmt;

type Payloads = Box<dyn Iterator<Item = Vec<u8>> + Send>;

/// A lazy, pull-based sequence of payloads destined for one topic
pub struct PublishRequest {
    topic: TopicId,
    write_pointer: Option<u64>,
    payloads: Payloads,
}

impl PublishRequest {
    /// Create a non-transactional request
    pub fn new<I>(topic: TopicId, payloads: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            topic,
            write_pointer: None,
            payloads: Box::new(payloads.into_iter()),
        }
    }

    /// Create a request issued by the transaction with the given write pointer
    pub fn transactional<I>(topic: TopicId, write_pointer: u64, payloads: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            topic,
            write_pointer: Some(write_pointer),
            payloads: Box::new(payloads.into_iter()),
        }
    }

    /// Convenience constructor for UTF-8 payloads
    pub fn from_strings<S: AsRef<str>>(topic: TopicId, payloads: &[S]) -> Self {
        let payloads: Vec<Vec<u8>> = payloads
            .iter()
            .map(|p| p.as_ref().as_bytes().to_vec())
            .collect();
        Self::new(topic, payloads)
    }

    pub fn topic(&self) -> &TopicId {
        &self.topic
    }

    pub fn is_transactional(&self) -> bool {
        self.write_pointer.is_some()
    }

    /// Write pointer of the issuing transaction, if transactional
    pub fn transaction_write_pointer(&self) -> Option<u64> {
        self.write_pointer
    }
}

impl Iterator for PublishRequest {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.payloads.next()
    }
}

impl fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("topic", &self.topic)
            .field("write_pointer", &self.write_pointer)
            .finish_non_exhaustive()
    }
}
