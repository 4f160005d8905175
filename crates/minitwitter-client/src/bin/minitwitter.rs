//! MiniTwitter command-line client.
//!
//! # Usage
//!
//! ```bash
//! minitwitter send "hello world"
//! minitwitter --server 127.0.0.1:50051 get 10
//! ```

use clap::{Parser, Subcommand};
use minitwitter_client::Client;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// MiniTwitter client
#[derive(Parser, Debug)]
#[command(name = "minitwitter")]
#[command(about = "Send and read MiniTwitter messages")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "localhost:50051")]
    server: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a message
    Send {
        /// Message text
        message: String,
    },
    /// Print the most recent messages, oldest first
    Get {
        /// Number of messages to fetch
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut client = Client::connect(args.server.as_str()).await?;

    match args.command {
        Command::Send { message } => {
            let status = client.send_message(&message).await?;
            print_lines([status]);
        },
        Command::Get { count } => {
            let messages = client.get_messages(count).await?;
            print_lines(messages);
        },
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}
