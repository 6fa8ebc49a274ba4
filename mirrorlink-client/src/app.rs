//! Ready-made sender and receiver peers.

use crate::config::{CaptureConfig, PeerConfig, TransportConfig};
use crate::error::ClientError;
use crate::media::{CapturePump, DisplayPipeline, FrameSink, FrameSource};
use crate::negotiation::NegotiationRole;
use crate::observer::ConnectionObserver;
use crate::session::{PeerSession, SessionEnd};
use crate::transport::WebRtcTransport;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

const EVENT_QUEUE_CAPACITY: usize = 64;

/// Shares frames from `source` with whoever is waiting in the room.
pub async fn run_sender<S, F>(
    config: PeerConfig,
    transport_config: TransportConfig,
    capture: CaptureConfig,
    source: S,
    shutdown: F,
) -> Result<SessionEnd, ClientError>
where
    S: FrameSource,
    F: Future<Output = ()>,
{
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let transport = WebRtcTransport::new(transport_config, event_tx)
        .await
        .map_err(ClientError::Setup)?;
    let track = transport
        .add_video_track()
        .await
        .map_err(ClientError::Setup)?;

    let pump = CapturePump::spawn(source, track, capture);
    let session = PeerSession::new(
        config,
        NegotiationRole::Initiator,
        Arc::new(transport),
        event_rx,
        ConnectionObserver::log_only(),
    );
    let result = session.run(shutdown).await;

    let frames = pump.stop().await;
    info!("Sent {} frames", frames);
    result
}

/// Waits for a sender in the room and displays its video into `sink`.
pub async fn run_receiver<F>(
    config: PeerConfig,
    transport_config: TransportConfig,
    sink: Box<dyn FrameSink>,
    shutdown: F,
) -> Result<SessionEnd, ClientError>
where
    F: Future<Output = ()>,
{
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let transport = WebRtcTransport::new(transport_config, event_tx)
        .await
        .map_err(ClientError::Setup)?;

    let observer = ConnectionObserver::with_display(DisplayPipeline::spawn(sink));
    let session = PeerSession::new(
        config,
        NegotiationRole::Responder,
        Arc::new(transport),
        event_rx,
        observer,
    );
    session.run(shutdown).await
}
