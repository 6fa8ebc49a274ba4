//! Offer/answer state machine for one peer.
//!
//! The initiator offers whenever local media changes and installs the
//! answer. The responder waits for offers and answers each one, including
//! offers that arrive after the session is up. Every remote description is
//! stripped of retransmission lines before it reaches the transport.
//!
//! Calls take `&mut self`, so at most one round runs at a time. Offer
//! requests that arrive while a round is in flight are folded into a single
//! follow-up round. The first offer is kept until answered so it can be sent
//! again: the relay drops messages sent into a room with no other member.

use crate::error::NegotiationError;
use crate::negotiation::{NegotiationRole, NegotiationState, SignalingOutput};
use crate::transport::MediaTransport;
use mirrorlink_core::{SdpType, SessionDescription, SignalMessage};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct Negotiator<T: MediaTransport, O: SignalingOutput> {
    role: NegotiationRole,
    state: NegotiationState,
    transport: Arc<T>,
    output: O,
    renegotiation_pending: bool,
    unanswered_offer: Option<SessionDescription>,
    rounds: u32,
}

impl<T: MediaTransport, O: SignalingOutput> Negotiator<T, O> {
    pub fn new(role: NegotiationRole, transport: Arc<T>, output: O) -> Self {
        Self {
            role,
            state: NegotiationState::Idle,
            transport,
            output,
            renegotiation_pending: false,
            unanswered_offer: None,
            rounds: 0,
        }
    }

    pub fn role(&self) -> NegotiationRole {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Completed offer/answer rounds.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn is_connected(&self) -> bool {
        self.state == NegotiationState::Connected
    }

    pub fn renegotiation_pending(&self) -> bool {
        self.renegotiation_pending
    }

    /// True while the first offer is out and no answer has come back.
    pub fn awaiting_answer(&self) -> bool {
        self.state == NegotiationState::OfferSent && self.unanswered_offer.is_some()
    }

    /// Call once the signaling channel is open.
    pub fn start(&mut self) {
        if self.role == NegotiationRole::Responder && self.state == NegotiationState::Idle {
            self.transition(NegotiationState::AwaitingOffer);
        }
    }

    /// Creates an offer, installs it locally and sends it.
    ///
    /// Returns `false` if a round is already in flight; in that case one
    /// follow-up round is queued and runs after the pending answer.
    pub async fn create_offer(&mut self) -> Result<bool, NegotiationError> {
        let next = match (self.role, self.state) {
            (_, NegotiationState::Failed) => return Err(NegotiationError::Failed),
            (NegotiationRole::Responder, _) => {
                return Err(NegotiationError::WrongRole {
                    role: self.role,
                    operation: "create_offer",
                });
            }
            (_, NegotiationState::OfferSent | NegotiationState::Renegotiating) => {
                if !self.renegotiation_pending {
                    debug!("Offer already in flight, queueing renegotiation");
                }
                self.renegotiation_pending = true;
                return Ok(false);
            }
            (_, NegotiationState::Connected) => NegotiationState::Renegotiating,
            _ => NegotiationState::OfferSent,
        };

        let offer = match self.transport.create_offer().await {
            Ok(offer) => offer,
            Err(e) => return Err(self.fail(NegotiationError::Transport(e))),
        };
        if next == NegotiationState::OfferSent {
            self.unanswered_offer = Some(offer.clone());
        }
        self.send(offer).await?;

        self.transition(next);
        info!("Sent offer (round {})", self.rounds + 1);
        Ok(true)
    }

    /// Sends the unanswered first offer again, unchanged. Returns `false`
    /// when there is nothing to resend.
    pub async fn resend_offer(&mut self) -> Result<bool, NegotiationError> {
        if !self.awaiting_answer() {
            return Ok(false);
        }
        let Some(offer) = self.unanswered_offer.clone() else {
            return Ok(false);
        };
        self.send(offer).await?;
        debug!("Resent unanswered offer");
        Ok(true)
    }

    /// Feeds one text frame from the signaling channel.
    ///
    /// Malformed frames and offers or answers that cannot be installed move
    /// the negotiator to `Failed`. Messages that don't fit the current state
    /// once a session exists are logged and ignored.
    pub async fn handle_incoming(&mut self, text: &str) -> Result<NegotiationState, NegotiationError> {
        if self.state == NegotiationState::Failed {
            return Err(NegotiationError::Failed);
        }

        let msg = match SignalMessage::from_json(text) {
            Ok(msg) => msg,
            Err(e) => return Err(self.fail(e.into())),
        };
        debug!("Received {} ({} bytes of SDP)", msg.kind(), msg.sdp().len());

        match self.role {
            NegotiationRole::Initiator => self.handle_as_initiator(msg).await,
            NegotiationRole::Responder => self.handle_as_responder(msg).await,
        }
    }

    async fn handle_as_initiator(&mut self, msg: SignalMessage) -> Result<NegotiationState, NegotiationError> {
        match (msg.kind(), self.state) {
            (SdpType::Answer, NegotiationState::OfferSent | NegotiationState::Renegotiating) => {
                let answer = msg.into_description().without_retransmission();
                self.install_remote(answer).await?;
                self.unanswered_offer = None;

                self.rounds += 1;
                self.transition(NegotiationState::Connected);
                info!("Negotiation round {} complete", self.rounds);

                if std::mem::take(&mut self.renegotiation_pending) {
                    self.create_offer().await?;
                }
                Ok(self.state)
            }
            (kind, state) => {
                warn!("Ignoring {} while {}", kind, state);
                Ok(self.state)
            }
        }
    }

    async fn handle_as_responder(&mut self, msg: SignalMessage) -> Result<NegotiationState, NegotiationError> {
        match (msg.kind(), self.state) {
            (
                SdpType::Offer,
                NegotiationState::Idle | NegotiationState::AwaitingOffer | NegotiationState::Connected,
            ) => {
                if self.state == NegotiationState::Connected {
                    self.transition(NegotiationState::Renegotiating);
                }

                let offer = msg.into_description().without_retransmission();
                self.install_remote(offer).await?;

                let answer = match self.transport.create_answer().await {
                    Ok(answer) => answer,
                    Err(e) => return Err(self.fail(NegotiationError::Transport(e))),
                };
                self.send(answer).await?;
                self.transition(NegotiationState::AnswerSent);

                // Delivery to the channel is all the confirmation there is.
                self.rounds += 1;
                self.transition(NegotiationState::Connected);
                info!("Answered offer (round {})", self.rounds);
                Ok(self.state)
            }
            (kind, state @ (NegotiationState::Idle | NegotiationState::AwaitingOffer)) => {
                Err(self.fail(NegotiationError::UnexpectedMessage { kind, state }))
            }
            (kind, state) => {
                warn!("Ignoring {} while {}", kind, state);
                Ok(self.state)
            }
        }
    }

    async fn install_remote(&mut self, desc: SessionDescription) -> Result<(), NegotiationError> {
        match self.transport.set_remote_description(desc).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(NegotiationError::Rejected(e))),
        }
    }

    async fn send(&mut self, desc: SessionDescription) -> Result<(), NegotiationError> {
        match self.output.send_signal(desc.into_message()).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn transition(&mut self, next: NegotiationState) {
        debug!("Negotiation state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: NegotiationError) -> NegotiationError {
        error!("Negotiation failed: {}", err);
        self.renegotiation_pending = false;
        self.unanswered_offer = None;
        self.transition(NegotiationState::Failed);
        err
    }
}
