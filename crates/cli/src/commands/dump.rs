// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tms dump` - Print journal entries as JSON lines

use anyhow::Result;
use clap::Args;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tms_core::{Config, MessageEntry, PayloadEntry, TableEntry, TopicId};
use tms_storage::JournalReader;

#[derive(Args)]
pub struct DumpArgs {
    /// Only print entries for this topic (namespace:topic)
    #[arg(long)]
    pub topic: Option<TopicId>,

    /// Read the payload table instead of the message table
    #[arg(long)]
    pub payloads: bool,
}

/// One printed line
#[derive(Debug, Serialize)]
pub(crate) struct DumpLine {
    pub topic: String,
    pub position: String,
    pub timestamp: u64,
    pub sequence_id: u16,
    /// UTF-8 (lossy) payload text, absent for payload references
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl DumpLine {
    pub(crate) fn from_entry<E: TableEntry>(entry: &E) -> Self {
        let position = entry.position();
        Self {
            topic: entry.topic().to_string(),
            position: position.to_string(),
            timestamp: position.timestamp,
            sequence_id: position.sequence_id,
            payload: entry
                .payload()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

pub fn handle(args: DumpArgs, config: &Config) -> Result<()> {
    if args.payloads {
        dump::<PayloadEntry>(&config.payload_journal(), args.topic.as_ref())
    } else {
        dump::<MessageEntry>(&config.message_journal(), args.topic.as_ref())
    }
}

fn dump<E>(path: &Path, topic: Option<&TopicId>) -> Result<()>
where
    E: TableEntry + DeserializeOwned + Serialize,
{
    let entries = JournalReader::<E>::open(path).read_valid()?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "journal read");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in entries
        .iter()
        .filter(|entry| topic.map_or(true, |topic| entry.topic() == topic))
    {
        serde_json::to_writer(&mut out, &DumpLine::from_entry(entry))?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "dump_tests.rs"]
mod tests;
