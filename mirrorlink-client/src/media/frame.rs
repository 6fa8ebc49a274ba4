use bytes::Bytes;

/// One unit of media pulled from a remote track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFrame {
    pub track_id: String,
    pub timestamp: u32,
    pub payload: Bytes,
}

impl MediaFrame {
    pub fn new(track_id: impl Into<String>, timestamp: u32, payload: Bytes) -> Self {
        Self {
            track_id: track_id.into(),
            timestamp,
            payload,
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
