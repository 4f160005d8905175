//! MiniTwitter server binary.
//!
//! # Usage
//!
//! ```bash
//! # Listen on the default port
//! minitwitter-server
//!
//! # Custom address, log to a file
//! minitwitter-server --bind 127.0.0.1:50051 --log-file logs/server.log
//! ```

use std::path::PathBuf;

use clap::Parser;
use minitwitter_proto::DEFAULT_MAX_PAYLOAD_SIZE;
use minitwitter_server::{Server, ServerRuntimeConfig, init_tracing};

/// MiniTwitter message broadcast server
#[derive(Parser, Debug)]
#[command(name = "minitwitter-server")]
#[command(about = "MiniTwitter message broadcast server")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "[::]:50051")]
    bind: String,

    /// Maximum requests handled concurrently
    #[arg(long, default_value = "10")]
    max_workers: usize,

    /// Maximum frame payload size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_SIZE)]
    max_frame_size: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_file.as_deref())?;

    tracing::info!("MiniTwitter server starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerRuntimeConfig {
        bind_address: args.bind,
        max_workers: args.max_workers,
        max_frame_size: args.max_frame_size,
    };

    let server = Server::bind(config).await?;
    server.run_until(shutdown_signal()).await?;

    tracing::info!("MiniTwitter server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl-C received, shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        },
    }
}
