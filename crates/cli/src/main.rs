// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tms - batched message writer CLI

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{bench, dump, publish};
use std::path::PathBuf;
use tms_core::Config;

#[derive(Parser)]
#[command(
    name = "tms",
    version,
    about = "Transactional message store - concurrent batched message writer"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage directory, overriding the configured one
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish from many threads at once and report throughput
    Bench(bench::BenchArgs),
    /// Publish one request to the message journal
    Publish(publish::PublishArgs),
    /// Print message journal entries as JSON lines
    Dump(dump::DumpArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = cli.dir {
        config.storage.dir = dir;
    }

    match cli.command {
        Commands::Bench(args) => bench::handle(args, &config),
        Commands::Publish(args) => publish::handle(args, &config),
        Commands::Dump(args) => dump::handle(args, &config),
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
