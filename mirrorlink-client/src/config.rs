use mirrorlink_core::RoomId;
use std::time::Duration;

/// Where a peer process finds its counterpart.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Relay base address, e.g. `ws://127.0.0.1:8000`.
    pub signaling: String,
    pub room: RoomId,
}

impl PeerConfig {
    pub fn new(signaling: impl Into<String>, room: impl Into<RoomId>) -> Self {
        Self {
            signaling: signaling.into(),
            room: room.into(),
        }
    }

    /// Room-scoped relay endpoint. The room id is one percent-encoded path
    /// segment, so any string names exactly one room.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/ws/{}",
            self.signaling.trim_end_matches('/'),
            urlencoding::encode(self.room.as_str())
        )
    }
}

/// Configuration for the WebRTC transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec!["stun:stun.l.google.com:19302".to_owned()],
        }
    }
}

/// Screen region and rate for the capture side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConfig {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 1920,
            height: 1080,
            frame_rate: 15.0,
        }
    }
}

impl CaptureConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(0.1))
    }
}
