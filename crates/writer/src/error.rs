// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the message writer

use std::io;
use std::sync::Arc;
use thiserror::Error;
use tms_core::TopicId;
use tms_storage::StoreError;

/// Errors returned to publishers
///
/// One storage failure can fail many requests at once, so the cause is
/// shared and the error is cheap to clone.
#[derive(Debug, Clone, Error)]
pub enum WriteError {
    #[error("message writer is already closed")]
    Closed,
    #[error("invalid publish request for {topic}: {reason}")]
    InvalidRequest { topic: TopicId, reason: String },
    #[error("unable to write messages to {topic}: {source}")]
    Storage {
        topic: TopicId,
        #[source]
        source: Arc<StoreError>,
    },
    #[error("failed to flush pending messages on close: {0}")]
    Flush(#[source] Arc<StoreError>),
    #[error("failed to close storage table: {0}")]
    CloseTable(#[source] Arc<StoreError>),
}

impl WriteError {
    pub(crate) fn storage(topic: &TopicId, cause: &Arc<StoreError>) -> Self {
        Self::Storage {
            topic: topic.clone(),
            source: Arc::clone(cause),
        }
    }

    /// The underlying storage failure, if this error came from the table
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Storage { source, .. } | Self::Flush(source) | Self::CloseTable(source) => {
                Some(source.as_ref())
            }
            Self::Closed | Self::InvalidRequest { .. } => None,
        }
    }
}

impl From<WriteError> for io::Error {
    /// Keeps the original error kind when the table failed with an IO error
    fn from(err: WriteError) -> Self {
        let kind = match err.store_error() {
            Some(StoreError::Io(e)) => e.kind(),
            Some(_) => io::ErrorKind::Other,
            None => match err {
                WriteError::Closed => io::ErrorKind::NotConnected,
                _ => io::ErrorKind::InvalidInput,
            },
        };
        io::Error::new(kind, err)
    }
}
