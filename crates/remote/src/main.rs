// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tariff-remote: stub tariff authority over WebSocket.
//!
//! Serves a fixed set of users and tariffs, either the built-in dataset or
//! one read from a JSON seed file, with optional artificial latency.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use state::{AuthorityState, Latency};

/// tariff-remote: stub tariff authority
#[derive(Parser, Debug)]
#[command(name = "tariff-remote")]
#[command(about = "WebSocket stub authority serving canned tariffs")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// JSON seed file with `users` and `tariffs` (default: built-in dataset)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Delay before answering a login, in milliseconds
    #[arg(long, default_value = "0")]
    auth_latency_ms: u64,

    /// Delay before answering a fetch, in milliseconds
    #[arg(long, default_value = "0")]
    fetch_latency_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tariff-remote server");
    info!("  Bind address: {}", args.bind);
    match args.data {
        Some(ref path) => info!("  Seed file: {}", path.display()),
        None => info!("  Seed file: built-in dataset"),
    }

    let latency = Latency {
        auth: Duration::from_millis(args.auth_latency_ms),
        fetch: Duration::from_millis(args.fetch_latency_ms),
    };
    let state = AuthorityState::load(args.data.as_deref(), latency)?;
    info!("  Accounts: {}", state.account_count());

    server::run(args.bind, state).await?;

    Ok(())
}
