// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a `namespace:topic` string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicIdError {
    #[error("missing ':' separator in topic id {0:?}")]
    MissingSeparator(String),
    #[error("empty namespace or topic in topic id {0:?}")]
    Empty(String),
}

/// Logical destination of published messages
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TopicId {
    pub namespace: String,
    pub topic: String,
}

impl TopicId {
    pub fn new(namespace: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            topic: topic.into(),
        }
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.topic)
    }
}

impl FromStr for TopicId {
    type Err = TopicIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, topic) = s
            .split_once(':')
            .ok_or_else(|| TopicIdError::MissingSeparator(s.to_string()))?;
        if namespace.is_empty() || topic.is_empty() {
            return Err(TopicIdError::Empty(s.to_string()));
        }
        Ok(Self::new(namespace, topic))
    }
}
