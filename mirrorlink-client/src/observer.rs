use crate::media::DisplayPipeline;
use crate::transport::{ConnectionState, RemoteTrack, TrackKind, TransportEvent};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reacts to transport events on behalf of the session.
///
/// Video tracks are handed to the display pipeline, once per track id.
/// Connection state changes are logged only; a failed connection does not
/// feed back into negotiation.
pub struct ConnectionObserver {
    display: Option<DisplayPipeline>,
    attached: HashSet<String>,
    last_state: Option<ConnectionState>,
}

impl ConnectionObserver {
    /// Observer that only logs (the sending side).
    pub fn log_only() -> Self {
        Self {
            display: None,
            attached: HashSet::new(),
            last_state: None,
        }
    }

    pub fn with_display(display: DisplayPipeline) -> Self {
        Self {
            display: Some(display),
            ..Self::log_only()
        }
    }

    pub fn handle(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::TrackReceived(track) => {
                self.on_track_received(track);
            }
            TransportEvent::ConnectionStateChanged(state) => self.on_connection_state_changed(state),
            TransportEvent::NegotiationNeeded => {
                debug!("Negotiation needed, left to the negotiator");
            }
        }
    }

    /// Returns whether the track was attached to the display.
    pub fn on_track_received(&mut self, track: Arc<dyn RemoteTrack>) -> bool {
        let id = track.id();
        let kind = track.kind();
        info!("Received {} track {}", kind, id);

        if kind != TrackKind::Video {
            debug!("Track {} is not video, not displaying it", id);
            return false;
        }
        let Some(display) = self.display.as_mut() else {
            debug!("No display configured, ignoring track {}", id);
            return false;
        };
        if !self.attached.insert(id.clone()) {
            debug!("Track {} is already displayed", id);
            return false;
        }

        display.attach(track);
        true
    }

    pub fn on_connection_state_changed(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Failed => warn!("Connection state: {}", state),
            _ => info!("Connection state: {}", state),
        }
        self.last_state = Some(state);
    }

    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.last_state
    }

    pub fn displayed_tracks(&self) -> usize {
        self.attached.len()
    }

    /// Stops the display, if any, and releases its sink.
    pub async fn shutdown(self) {
        if let Some(display) = self.display {
            display.shutdown().await;
        }
    }
}
