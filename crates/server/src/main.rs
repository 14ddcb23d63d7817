// ABOUTME: Binary entry point for the podcal feed gateway server.
// ABOUTME: Wires CLI args, tracing, the gateway, and axum together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use podcal_gateway::Gateway;
use podcal_server::{app, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve the podcast feed calendar API.
#[derive(Parser, Debug)]
#[command(name = "podcal-server")]
#[command(about = "Serve the podcast feed calendar API", long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8787")]
    listen: SocketAddr,

    /// User-Agent sent on upstream feed fetches.
    #[arg(long, default_value = "podcal/0.1")]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let gateway = Arc::new(Gateway::builder().user_agent(&args.user_agent).build());
    let state = AppState { gateway };

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!(listen = %args.listen, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
