use thiserror::Error;

/// Reasons an inbound negotiation message cannot be decoded.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("signal message is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must be a string")]
    InvalidField(&'static str),

    #[error("unknown message type `{0}`")]
    UnknownType(String),
}
