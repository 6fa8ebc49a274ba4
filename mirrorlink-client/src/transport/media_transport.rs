use anyhow::Result;
use async_trait::async_trait;
use mirrorlink_core::SessionDescription;

/// The part of a peer connection the negotiator drives.
///
/// `create_offer` and `create_answer` also install the result as the local
/// description before returning it.
#[async_trait]
pub trait MediaTransport: Send + Sync + 'static {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn close(&self) -> Result<()>;
}
