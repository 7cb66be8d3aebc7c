// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tms publish` - Publish one request to the message journal

use super::open_journal_writer;
use anyhow::{bail, Result};
use clap::Args;
use tms_core::{Config, PublishRequest, TopicId};
use tms_writer::{MessageTableTransform, PayloadTableTransform, WriteReceipt};

#[derive(Args)]
pub struct PublishArgs {
    /// Topic to publish to (namespace:topic)
    #[arg(long)]
    pub topic: TopicId,

    /// Publish transactionally with this write pointer
    #[arg(long = "tx", value_name = "WRITE_POINTER")]
    pub write_pointer: Option<u64>,

    /// Store the payloads in the payload table and publish a reference to them
    #[arg(long, requires = "write_pointer")]
    pub payload_table: bool,

    /// Message payloads, one entry each
    pub payloads: Vec<String>,
}

/// Build the request written to the message table
pub(crate) fn message_request(args: &PublishArgs) -> PublishRequest {
    let payloads: Vec<Vec<u8>> = if args.payload_table {
        Vec::new()
    } else {
        payload_bytes(args)
    };
    match args.write_pointer {
        Some(write_pointer) => {
            PublishRequest::transactional(args.topic.clone(), write_pointer, payloads)
        }
        None => PublishRequest::new(args.topic.clone(), payloads),
    }
}

fn payload_bytes(args: &PublishArgs) -> Vec<Vec<u8>> {
    args.payloads.iter().map(|p| p.as_bytes().to_vec()).collect()
}

pub fn handle(args: PublishArgs, config: &Config) -> Result<()> {
    if args.payload_table {
        let Some(write_pointer) = args.write_pointer else {
            bail!("--payload-table needs a transaction write pointer (--tx)");
        };
        let writer =
            open_journal_writer(&config.payload_journal(), PayloadTableTransform, config)?;
        let request =
            PublishRequest::transactional(args.topic.clone(), write_pointer, payload_bytes(&args));
        let receipt = writer.persist(request);
        writer.close()?;
        print_receipt(&receipt?)?;
    }

    let writer = open_journal_writer(&config.message_journal(), MessageTableTransform, config)?;
    let receipt = writer.persist(message_request(&args));
    writer.close()?;
    print_receipt(&receipt?)
}

fn print_receipt(receipt: &WriteReceipt) -> Result<()> {
    println!("{}", serde_json::to_string(receipt)?);
    Ok(())
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
