use crate::error::NegotiationError;
use async_trait::async_trait;
use mirrorlink_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outbound half of the signaling channel, as seen by the negotiator.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_signal(&self, msg: SignalMessage) -> Result<(), NegotiationError>;
}

#[async_trait]
impl<O: SignalingOutput + ?Sized> SignalingOutput for Arc<O> {
    async fn send_signal(&self, msg: SignalMessage) -> Result<(), NegotiationError> {
        (**self).send_signal(msg).await
    }
}

/// Encodes messages and queues them for the channel writer task.
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SignalingOutput for ChannelOutput {
    async fn send_signal(&self, msg: SignalMessage) -> Result<(), NegotiationError> {
        let text = msg.to_json()?;
        self.tx
            .send(text)
            .map_err(|_| NegotiationError::ChannelClosed)
    }
}
