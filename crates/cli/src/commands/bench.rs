// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tms bench` - Publish from many threads and report throughput

use super::open_journal_writer;
use anyhow::{anyhow, Result};
use clap::Args;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use tms_core::{Config, MessageEntry, PublishRequest, SystemTimeProvider, TopicId};
use tms_storage::MemoryTable;
use tms_writer::{
    ConcurrentMessageWriter, MessageTableTransform, MessageTableWriter, RequestWriter,
};

#[derive(Args)]
pub struct BenchArgs {
    /// Publishing threads
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Messages published by each thread
    #[arg(long, default_value_t = 10_000)]
    pub messages: usize,

    /// Payloads per publish request
    #[arg(long, default_value_t = 1)]
    pub batch: usize,

    /// Topic to publish to (namespace:topic)
    #[arg(long, default_value = "bench:messages")]
    pub topic: TopicId,

    /// Write to an in-memory table instead of the journal
    #[arg(long)]
    pub memory: bool,
}

/// Results of one bench run
#[derive(Debug)]
pub(crate) struct BenchReport {
    pub threads: usize,
    pub requests: usize,
    pub messages: usize,
    pub elapsed: Duration,
    /// Known only for the in-memory table
    pub physical_writes: Option<usize>,
}

impl BenchReport {
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.messages as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "threads:         {}", self.threads)?;
        writeln!(f, "requests:        {}", self.requests)?;
        writeln!(f, "messages:        {}", self.messages)?;
        writeln!(f, "elapsed:         {:.3}s", self.elapsed.as_secs_f64())?;
        write!(f, "throughput:      {:.0} msg/s", self.throughput())?;
        if let Some(writes) = self.physical_writes {
            write!(f, "\nphysical writes: {}", writes)?;
        }
        Ok(())
    }
}

/// Split one thread's messages into request sizes of at most `batch`
pub(crate) fn request_sizes(messages: usize, batch: usize) -> Vec<usize> {
    let batch = batch.max(1);
    let mut sizes = vec![batch; messages / batch];
    if messages % batch > 0 {
        sizes.push(messages % batch);
    }
    sizes
}

pub fn handle(args: BenchArgs, config: &Config) -> Result<()> {
    let report = if args.memory {
        let table = MemoryTable::<MessageEntry>::new();
        let writer = ConcurrentMessageWriter::with_capacity(
            MessageTableWriter::with_config(
                table.clone(),
                MessageTableTransform,
                SystemTimeProvider,
                &config.writer,
            ),
            config.writer.batch_capacity,
        );
        let mut report = run(&writer, &args)?;
        writer.close()?;
        report.physical_writes = Some(table.write_sizes().len());
        report
    } else {
        let writer = open_journal_writer(&config.message_journal(), MessageTableTransform, config)?;
        let report = run(&writer, &args)?;
        writer.close()?;
        report
    };

    println!("{}", report);
    Ok(())
}

fn run<W: RequestWriter>(
    writer: &ConcurrentMessageWriter<W>,
    args: &BenchArgs,
) -> Result<BenchReport> {
    let sizes = request_sizes(args.messages, args.batch);
    tracing::info!(
        threads = args.threads,
        requests_per_thread = sizes.len(),
        topic = %args.topic,
        "bench starting"
    );

    let started = Instant::now();
    let written = thread::scope(|s| {
        let handles: Vec<_> = (0..args.threads)
            .map(|publisher| {
                let sizes = &sizes;
                let topic = &args.topic;
                s.spawn(move || publish_thread(writer, topic, publisher, sizes))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("bench thread panicked"))?
            })
            .sum::<Result<usize>>()
    })?;

    Ok(BenchReport {
        threads: args.threads,
        requests: sizes.len() * args.threads,
        messages: written,
        elapsed: started.elapsed(),
        physical_writes: None,
    })
}

fn publish_thread<W: RequestWriter>(
    writer: &ConcurrentMessageWriter<W>,
    topic: &TopicId,
    publisher: usize,
    sizes: &[usize],
) -> Result<usize> {
    let mut written = 0;
    for (request, &size) in sizes.iter().enumerate() {
        let payloads: Vec<Vec<u8>> = (0..size)
            .map(|i| format!("bench-{}-{}-{}", publisher, request, i).into_bytes())
            .collect();
        let receipt = writer.persist(PublishRequest::new(topic.clone(), payloads))?;
        written += receipt.entries as usize;
    }
    Ok(written)
}

#[cfg(test)]
#[path = "bench_tests.rs"]
mod tests;
