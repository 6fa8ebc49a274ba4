use crate::negotiation::{NegotiationRole, NegotiationState};
use mirrorlink_core::{ProtocolError, SdpType};
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("malformed negotiation message: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unexpected {kind} while {state}")]
    UnexpectedMessage {
        kind: SdpType,
        state: NegotiationState,
    },
    #[error("remote description rejected: {0:#}")]
    Rejected(anyhow::Error),
    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),
    #[error("signaling channel closed")]
    ChannelClosed,
    #[error("{operation} is not available to the {role}")]
    WrongRole {
        role: NegotiationRole,
        operation: &'static str,
    },
    #[error("negotiation has already failed")]
    Failed,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("signaling channel error: {0}")]
    Channel(#[from] tungstenite::Error),
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    #[error("transport setup failed: {0:#}")]
    Setup(anyhow::Error),
}
