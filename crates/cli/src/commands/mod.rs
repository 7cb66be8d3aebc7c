// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod bench;
pub mod dump;
pub mod publish;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tms_core::{Config, SystemTimeProvider};
use tms_storage::JournalTable;
use tms_writer::{ConcurrentMessageWriter, PublishRequestWriter, RequestTransform};

pub(crate) type JournalWriter<X> = ConcurrentMessageWriter<
    PublishRequestWriter<JournalTable<<X as RequestTransform>::Entry>, X, SystemTimeProvider>,
>;

/// Open a batched writer over the journal at `path`
///
/// A torn tail left by an earlier crash is cut off before appending.
pub(crate) fn open_journal_writer<X>(
    path: &Path,
    transform: X,
    config: &Config,
) -> Result<JournalWriter<X>>
where
    X: RequestTransform,
    X::Entry: Serialize + DeserializeOwned + Send,
{
    let removed = JournalTable::<X::Entry>::repair(path)
        .with_context(|| format!("repairing journal {}", path.display()))?;
    if removed > 0 {
        tracing::warn!(path = %path.display(), bytes = removed, "discarded torn journal tail");
    }

    let table = JournalTable::open(path, config.storage.sync)
        .with_context(|| format!("opening journal {}", path.display()))?;
    let writer =
        PublishRequestWriter::with_config(table, transform, SystemTimeProvider, &config.writer);
    Ok(ConcurrentMessageWriter::with_capacity(
        writer,
        config.writer.batch_capacity,
    ))
}
