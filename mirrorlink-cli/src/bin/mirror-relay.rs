use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use mirrorlink::logging::init_logging;
use mirrorlink::server::RelayService;
use mirrorlink_cli::{banner, ctrl_c};
use tokio::net::TcpListener;
use tracing::info;

/// Room-scoped WebSocket relay for negotiation messages.
#[derive(Parser)]
#[command(name = "mirror-relay", version)]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("mirror-relay")?;

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind relay to {addr}"))?;

    banner("Signaling relay");
    println!("   📡 ws://{}/ws/{{room}}", listener.local_addr()?.to_string().cyan());

    RelayService::new()
        .serve(listener, ctrl_c())
        .await
        .context("Relay server failed")?;

    info!("Relay stopped");
    Ok(())
}
