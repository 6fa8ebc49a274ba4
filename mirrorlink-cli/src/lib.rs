//! Shared pieces of the mirrorlink binaries.

use clap::Args;
use colored::*;
use mirrorlink::client::PeerConfig;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct PeerArgs {
    /// Relay base address, e.g. ws://127.0.0.1:8000
    #[arg(long)]
    pub signaling: String,

    /// Room shared by the sender and the receiver
    #[arg(long)]
    pub room: String,
}

impl PeerArgs {
    pub fn peer_config(&self) -> PeerConfig {
        PeerConfig::new(self.signaling.as_str(), self.room.as_str())
    }
}

pub fn banner(title: &str) {
    println!("{}", format!("🚀 {title}").green().bold());
}

/// Resolves on Ctrl-C. A failed signal handler never resolves.
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
