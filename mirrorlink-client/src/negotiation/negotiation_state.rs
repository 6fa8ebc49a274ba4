use std::fmt;

/// Which side of the exchange a peer plays. Fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationRole {
    /// Sends offers (the screen sender).
    Initiator,
    /// Waits for offers and answers them (the receiver).
    Responder,
}

impl fmt::Display for NegotiationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiator => f.write_str("initiator"),
            Self::Responder => f.write_str("responder"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    AwaitingOffer,
    OfferSent,
    AnswerSent,
    Connected,
    Renegotiating,
    Failed,
}

impl NegotiationState {
    /// Whether an offer/answer round is in progress.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::OfferSent | Self::Renegotiating | Self::AnswerSent)
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingOffer => "awaiting offer",
            Self::OfferSent => "offer sent",
            Self::AnswerSent => "answer sent",
            Self::Connected => "connected",
            Self::Renegotiating => "renegotiating",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
