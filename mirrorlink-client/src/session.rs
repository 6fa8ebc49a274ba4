use crate::config::PeerConfig;
use crate::error::ClientError;
use crate::negotiation::{ChannelOutput, NegotiationRole, Negotiator};
use crate::observer::ConnectionObserver;
use crate::transport::{MediaTransport, TransportEvent};
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

/// How long queued outbound messages get to flush on the way out.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Period between repeats of an unanswered first offer.
pub const OFFER_RESEND_INTERVAL: Duration = Duration::from_secs(1);

type ChannelStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Shutdown,
    RelayClosed,
}

/// One peer process: the signaling channel, the negotiator and the
/// transport event loop, from connect to teardown.
pub struct PeerSession<T: MediaTransport> {
    config: PeerConfig,
    role: NegotiationRole,
    transport: Arc<T>,
    events: mpsc::Receiver<TransportEvent>,
    observer: ConnectionObserver,
}

impl<T: MediaTransport> PeerSession<T> {
    pub fn new(
        config: PeerConfig,
        role: NegotiationRole,
        transport: Arc<T>,
        events: mpsc::Receiver<TransportEvent>,
        observer: ConnectionObserver,
    ) -> Self {
        Self {
            config,
            role,
            transport,
            events,
            observer,
        }
    }

    /// Runs until `shutdown` resolves, the relay closes the channel, or
    /// negotiation fails. The transport is closed and the display released
    /// in every case.
    pub async fn run<F>(self, shutdown: F) -> Result<SessionEnd, ClientError>
    where
        F: Future<Output = ()>,
    {
        let Self {
            config,
            role,
            transport,
            mut events,
            observer,
        } = self;

        let url = config.endpoint_url();
        info!("Connecting to signaling relay at {}", url);
        let (ws, _) = match connect_async(url.as_str()).await {
            Ok(connected) => connected,
            Err(source) => {
                close_transport(transport.as_ref()).await;
                observer.shutdown().await;
                return Err(ClientError::Connect { url, source });
            }
        };
        info!("Joined room {} as {}", config.room, role);

        let (mut sink, mut stream) = ws.split();
        let (output, mut outbound) = ChannelOutput::new();
        let writer = tokio::spawn(async move {
            while let Some(text) = outbound.recv().await {
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    warn!("Failed to send to relay: {}", e);
                    return;
                }
            }
            let _ = sink.close().await;
        });

        let mut negotiator = Negotiator::new(role, Arc::clone(&transport), output);
        let mut observer = observer;
        let result = drive(
            &mut negotiator,
            &mut stream,
            &mut events,
            &mut observer,
            shutdown,
        )
        .await;

        debug!(
            "Session over after {} negotiation rounds ({})",
            negotiator.rounds(),
            negotiator.state()
        );
        drop(negotiator);
        if tokio::time::timeout(CLOSE_GRACE, writer).await.is_err() {
            warn!("Signaling writer did not finish in time");
        }
        close_transport(transport.as_ref()).await;
        observer.shutdown().await;

        result
    }
}

async fn drive<T, F>(
    negotiator: &mut Negotiator<T, ChannelOutput>,
    stream: &mut ChannelStream,
    events: &mut mpsc::Receiver<TransportEvent>,
    observer: &mut ConnectionObserver,
    shutdown: F,
) -> Result<SessionEnd, ClientError>
where
    T: MediaTransport,
    F: Future<Output = ()>,
{
    negotiator.start();
    if negotiator.role() == NegotiationRole::Initiator {
        negotiator.create_offer().await?;
    }

    // An offer sent before the responder joined went nowhere.
    let mut resend = tokio::time::interval_at(
        Instant::now() + OFFER_RESEND_INTERVAL,
        OFFER_RESEND_INTERVAL,
    );
    resend.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);
    let mut events_open = true;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down session");
                return Ok(SessionEnd::Shutdown);
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    negotiator.handle_incoming(text.as_str()).await?;
                }
                Some(Ok(Message::Binary(data))) => {
                    warn!("Ignoring {} byte binary frame from relay", data.len());
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("Relay closed the signaling channel");
                    return Ok(SessionEnd::RelayClosed);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            _ = resend.tick(), if negotiator.awaiting_answer() => {
                negotiator.resend_offer().await?;
            }
            event = events.recv(), if events_open => match event {
                Some(TransportEvent::NegotiationNeeded) => {
                    if negotiator.role() == NegotiationRole::Initiator {
                        negotiator.create_offer().await?;
                    } else {
                        debug!("Ignoring negotiation request as {}", negotiator.role());
                    }
                }
                Some(event) => observer.handle(event),
                None => {
                    debug!("Transport event stream ended");
                    events_open = false;
                }
            },
        }
    }
}

async fn close_transport<T: MediaTransport>(transport: &T) {
    if let Err(e) = transport.close().await {
        warn!("Failed to close transport: {:#}", e);
    }
}
