// Allow dead code for module API surface not yet exposed via RPC
#![allow(dead_code)]

mod bookmarks;
mod cache;
mod calendar;
mod content;
mod habits;
mod net;
mod personalization;
mod prayer;
mod progress;
mod rpc;
mod storage;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rafiq-core")]
#[command(about = "Rafiq Core - Backend engine for the Rafiq Islamic companion app")]
struct Cli {
    #[arg(long, default_value = "http")]
    mode: String,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value = "21730")]
    port: u16,

    /// Override the profile data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Cli {
    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rafiq")
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir();

    match cli.mode.as_str() {
        "http" => {
            tracing::info!(
                "Starting rafiq-core HTTP server on {}:{}",
                cli.host,
                cli.port
            );
            rpc::run_http_server(&cli.host, cli.port, data_dir).await
        }
        "stdio" => {
            tracing::info!("Starting rafiq-core JSON-RPC server (stdio mode)");
            rpc::run_stdio_server(data_dir).await
        }
        _ => {
            anyhow::bail!("Invalid mode: {}. Use 'http' or 'stdio'", cli.mode)
        }
    }
}
