use anyhow::Result;
use clap::Parser;
use mirrorlink::client::{CaptureConfig, SessionEnd, TestPatternSource, TransportConfig, run_sender};
use mirrorlink::logging::init_logging;
use mirrorlink_cli::{PeerArgs, banner, ctrl_c};
use tracing::{error, info};

/// Shares the screen with a receiver in the same room.
#[derive(Parser)]
#[command(name = "mirror-sender", version)]
struct Cli {
    #[command(flatten)]
    peer: PeerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("mirror-sender")?;

    let capture = CaptureConfig::default();
    banner("Screen sender");
    println!("   🖥  {}x{} @ {} fps", capture.width, capture.height, capture.frame_rate);

    let result = run_sender(
        cli.peer.peer_config(),
        TransportConfig::default(),
        capture,
        TestPatternSource::new(capture),
        ctrl_c(),
    )
    .await;

    match result {
        Ok(SessionEnd::Shutdown) => info!("Sender stopped"),
        Ok(SessionEnd::RelayClosed) => info!("Relay closed the session"),
        Err(e) => {
            error!("Sender failed: {}", e);
            return Err(e.into());
        }
    }
    Ok(())
}
