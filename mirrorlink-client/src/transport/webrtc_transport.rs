use crate::config::TransportConfig;
use crate::media::{MediaFrame, SampleWriter};
use crate::transport::{MediaTransport, RemoteTrack, TrackKind, TransportEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use mirrorlink_core::{SdpType, SessionDescription};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// Upper bound on waiting for ICE gathering before a description is sent.
/// Candidates travel inside the description, there is no trickle.
const GATHER_TIMEOUT: Duration = Duration::from_secs(10);

/// [`MediaTransport`] backed by a `webrtc` peer connection.
pub struct WebRtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcTransport {
    /// Builds the peer connection. Track arrivals, connection state changes
    /// and renegotiation requests are reported on `event_tx`.
    pub async fn new(config: TransportConfig, event_tx: mpsc::Sender<TransportEvent>) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }]
        };
        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    let _ = tx
                        .send(TransportEvent::ConnectionStateChanged(s.into()))
                        .await;
                })
            },
        ));

        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                Box::pin(async move {
                    info!("ICE connection state: {}", s);
                })
            },
        ));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    let track: Arc<dyn RemoteTrack> = Arc::new(WebRtcRemoteTrack { track });
                    let _ = tx.send(TransportEvent::TrackReceived(track)).await;
                })
            },
        ));

        let negotiation_tx = event_tx;
        peer_connection.on_negotiation_needed(Box::new(move || {
            let tx = negotiation_tx.clone();
            Box::pin(async move {
                let _ = tx.send(TransportEvent::NegotiationNeeded).await;
            })
        }));

        Ok(Self { peer_connection })
    }

    /// Attaches an outgoing VP8 video track and returns the handle frames
    /// are written to.
    pub async fn add_video_track(&self) -> Result<Arc<TrackLocalStaticSample>> {
        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
            "video".to_owned(),
            "mirrorlink-screen".to_owned(),
        ));

        let sender = self
            .peer_connection
            .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .context("Failed to add video track")?;

        // RTCP has to be read for the interceptors to run.
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while sender.read(&mut rtcp_buf).await.is_ok() {}
        });

        debug!("Video track attached");
        Ok(track)
    }

    async fn local_description(&self, kind: SdpType) -> Result<SessionDescription> {
        let local = self
            .peer_connection
            .local_description()
            .await
            .context("No local description after it was set")?;
        Ok(SessionDescription::new(kind, local.sdp))
    }

    async fn set_local_and_gather(&self, desc: RTCSessionDescription) -> Result<()> {
        let mut gathering_complete = self.peer_connection.gathering_complete_promise().await;
        self.peer_connection
            .set_local_description(desc)
            .await
            .context("Failed to set local description")?;

        if tokio::time::timeout(GATHER_TIMEOUT, gathering_complete.recv())
            .await
            .is_err()
        {
            warn!("ICE gathering timed out, sending the candidates found so far");
        }
        Ok(())
    }
}

#[async_trait]
impl MediaTransport for WebRtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        self.set_local_and_gather(offer).await?;
        self.local_description(SdpType::Offer).await
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .context("Failed to create answer")?;
        self.set_local_and_gather(answer).await?;
        self.local_description(SdpType::Answer).await
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = match desc.kind() {
            SdpType::Offer => RTCSessionDescription::offer(desc.into_sdp())?,
            SdpType::Answer => RTCSessionDescription::answer(desc.into_sdp())?,
        };
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("Failed to set remote description")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

struct WebRtcRemoteTrack {
    track: Arc<TrackRemote>,
}

#[async_trait]
impl RemoteTrack for WebRtcRemoteTrack {
    fn id(&self) -> String {
        self.track.id()
    }

    fn kind(&self) -> TrackKind {
        self.track.kind().into()
    }

    async fn next_frame(&self) -> Option<MediaFrame> {
        match self.track.read_rtp().await {
            Ok((packet, _)) => Some(MediaFrame::new(
                self.track.id(),
                packet.header.timestamp,
                packet.payload,
            )),
            Err(e) => {
                debug!("Track {} ended: {}", self.track.id(), e);
                None
            }
        }
    }
}

#[async_trait]
impl SampleWriter for TrackLocalStaticSample {
    async fn write_frame(&self, data: Bytes, duration: Duration) -> Result<()> {
        let sample = Sample {
            data,
            duration,
            ..Default::default()
        };
        self.write_sample(&sample).await?;
        Ok(())
    }
}
