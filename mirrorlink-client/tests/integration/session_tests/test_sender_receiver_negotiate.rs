use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use mirrorlink_client::{
    ConnectionObserver, DisplayPipeline, FrameSink, MediaFrame, NegotiationRole, PeerConfig,
    PeerSession, RemoteTrack, SessionEnd, TrackKind, TransportEvent,
};
use mirrorlink_core::{MediaDirection, SdpType};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

use crate::integration::init_tracing;
use crate::utils::{MockTransport, TestRelay, wait_until};

struct OneFrameTrack {
    sent: tokio::sync::Mutex<bool>,
}

#[async_trait]
impl RemoteTrack for OneFrameTrack {
    fn id(&self) -> String {
        "screen".to_owned()
    }

    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    async fn next_frame(&self) -> Option<MediaFrame> {
        let mut sent = self.sent.lock().await;
        if *sent {
            std::future::pending::<()>().await;
        }
        *sent = true;
        Some(MediaFrame::new("screen", 90_000, Bytes::from_static(b"frame")))
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    frames: Arc<Mutex<Vec<MediaFrame>>>,
    released: Arc<Mutex<bool>>,
}

impl FrameSink for RecordingSink {
    fn render(&mut self, frame: &MediaFrame) -> Result<()> {
        self.frames.lock().unwrap().push(frame.clone());
        Ok(())
    }

    fn release(&mut self) {
        *self.released.lock().unwrap() = true;
    }
}

#[tokio::test]
async fn test_sender_receiver_negotiate() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");
    let config = PeerConfig::new(relay.base_url(), "testroom");

    // Receiver joins first and waits for an offer.
    let receiver_transport = Arc::new(MockTransport::default());
    let sink = RecordingSink::default();
    let (receiver_events_tx, receiver_events) = mpsc::channel(16);
    let (receiver_stop, receiver_stop_rx) = oneshot::channel::<()>();
    let receiver = PeerSession::new(
        config.clone(),
        NegotiationRole::Responder,
        Arc::clone(&receiver_transport),
        receiver_events,
        ConnectionObserver::with_display(DisplayPipeline::spawn(Box::new(sink.clone()))),
    );
    let receiver = tokio::spawn(receiver.run(async move {
        let _ = receiver_stop_rx.await;
    }));
    relay.wait_for_members("testroom", 1).await.unwrap();

    let sender_transport = Arc::new(MockTransport::default());
    let (sender_events_tx, sender_events) = mpsc::channel(16);
    let (sender_stop, sender_stop_rx) = oneshot::channel::<()>();
    let sender = PeerSession::new(
        config,
        NegotiationRole::Initiator,
        Arc::clone(&sender_transport),
        sender_events,
        ConnectionObserver::log_only(),
    );
    let sender = tokio::spawn(sender.run(async move {
        let _ = sender_stop_rx.await;
    }));

    // Round one: the receiver installs a filtered offer, the sender the answer.
    wait_until(|| sender_transport.remote_count() == 1).await.unwrap();
    let offers = receiver_transport.remote_descriptions();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].kind(), SdpType::Offer);
    assert_eq!(offers[0].direction(), Some(MediaDirection::SendOnly));
    assert!(!offers[0].sdp().contains("rtx/90000"));
    assert!(!offers[0].sdp().contains("apt="));
    assert!(offers[0].sdp().contains("a=rtpmap:96 VP8/90000\r\n"));

    let answers = sender_transport.remote_descriptions();
    assert_eq!(answers[0].kind(), SdpType::Answer);
    assert_eq!(answers[0].direction(), Some(MediaDirection::RecvOnly));

    // Media change on the sender side triggers a second round.
    sender_events_tx
        .send(TransportEvent::NegotiationNeeded)
        .await
        .unwrap();
    wait_until(|| sender_transport.remote_count() == 2).await.unwrap();
    assert_eq!(sender_transport.offers(), 2);
    assert_eq!(receiver_transport.answers(), 2);

    // A video track on the receiver reaches the display once.
    let track: Arc<dyn RemoteTrack> = Arc::new(OneFrameTrack {
        sent: tokio::sync::Mutex::new(false),
    });
    receiver_events_tx
        .send(TransportEvent::TrackReceived(Arc::clone(&track)))
        .await
        .unwrap();
    receiver_events_tx
        .send(TransportEvent::TrackReceived(track))
        .await
        .unwrap();
    wait_until(|| !sink.frames.lock().unwrap().is_empty()).await.unwrap();

    let _ = sender_stop.send(());
    let _ = receiver_stop.send(());
    assert_eq!(sender.await.unwrap().unwrap(), SessionEnd::Shutdown);
    assert_eq!(receiver.await.unwrap().unwrap(), SessionEnd::Shutdown);

    assert_eq!(sink.frames.lock().unwrap().len(), 1);
    assert!(*sink.released.lock().unwrap());
    assert!(sender_transport.is_closed());
    assert!(receiver_transport.is_closed());

    relay.wait_for_members("testroom", 0).await.unwrap();
    relay.stop().await.unwrap();
}
