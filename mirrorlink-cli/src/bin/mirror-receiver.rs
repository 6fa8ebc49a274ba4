use anyhow::Result;
use clap::Parser;
use mirrorlink::client::{LogSink, SessionEnd, TransportConfig, run_receiver};
use mirrorlink::logging::init_logging;
use mirrorlink_cli::{PeerArgs, banner, ctrl_c};
use tracing::{error, info};

/// Waits for a sender in the room and displays its screen.
#[derive(Parser)]
#[command(name = "mirror-receiver", version)]
struct Cli {
    #[command(flatten)]
    peer: PeerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("mirror-receiver")?;

    banner("Screen receiver");
    println!("   ⏳ Waiting for an offer in room {}", cli.peer.room);

    let result = run_receiver(
        cli.peer.peer_config(),
        TransportConfig::default(),
        Box::new(LogSink::default()),
        ctrl_c(),
    )
    .await;

    match result {
        Ok(SessionEnd::Shutdown) => info!("Receiver stopped"),
        Ok(SessionEnd::RelayClosed) => info!("Relay closed the session"),
        Err(e) => {
            error!("Receiver failed: {}", e);
            return Err(e.into());
        }
    }
    Ok(())
}
