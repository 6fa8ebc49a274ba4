use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogShipError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame of {0} bytes exceeds the limit")]
    FrameTooLarge(usize),
    #[error("connection closed mid-frame")]
    Truncated,
    #[error("malformed log record: {0}")]
    Json(#[from] serde_json::Error),
}
