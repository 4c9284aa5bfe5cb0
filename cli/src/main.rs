// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # MemDAV
//!
//! WebDAV server that stores files in memory (or a directory with `--dir`),
//! optionally discarding written content, suppressing deletes, restricting
//! clients to read-only methods and requiring Basic authentication.
//!
//! Listens on any combination of plaintext TCP, TLS and a Unix socket. The
//! first listener to fail terminates the whole process.

use anyhow::{Context, Result};
use clap::Parser;
use memdav::args::Cli;
use memdav_core::application::pipeline::RequestPipeline;
use memdav_core::application::supervisor::ListenerSupervisor;
use memdav_core::infrastructure::dav::DavEngine;
use memdav_core::infrastructure::storage::create_filesystem;
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let config = cli.into_config().context("Invalid configuration")?;
    let filesystem = create_filesystem(&config.store).context("Failed to prepare storage")?;
    let engine = Arc::new(DavEngine::new(filesystem));
    let pipeline = Arc::new(RequestPipeline::new(config.policy, engine));
    let supervisor = ListenerSupervisor::new(config.listeners, pipeline)
        .context("Invalid configuration")?;

    let failure = supervisor.run().await;
    error!("{}", failure);
    std::process::exit(1);
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
