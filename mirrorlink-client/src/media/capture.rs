//! Sender-side capture pump: polls a [`FrameSource`] at the configured rate
//! and writes each frame to the outgoing track.

use crate::config::CaptureConfig;
use crate::shutdown::stopped;
use anyhow::Result;
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Produces encoded frames of the captured screen region.
#[async_trait]
pub trait FrameSource: Send + 'static {
    /// Next frame, or `None` once capture has ended.
    async fn grab(&mut self) -> Result<Option<Bytes>>;
}

/// Consumes frames on the outgoing side.
#[async_trait]
pub trait SampleWriter: Send + Sync + 'static {
    async fn write_frame(&self, data: Bytes, duration: Duration) -> Result<()>;
}

/// Synthetic source used when no real screen grabber is wired in. Each
/// frame carries its sequence number and the region geometry.
#[derive(Debug)]
pub struct TestPatternSource {
    config: CaptureConfig,
    sequence: u64,
    limit: Option<u64>,
}

impl TestPatternSource {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            sequence: 0,
            limit: None,
        }
    }

    /// Ends capture after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }
}

#[async_trait]
impl FrameSource for TestPatternSource {
    async fn grab(&mut self) -> Result<Option<Bytes>> {
        if self.limit.is_some_and(|limit| self.sequence >= limit) {
            return Ok(None);
        }

        let mut frame = BytesMut::with_capacity(24);
        frame.put_u64(self.sequence);
        frame.put_u32(self.config.left);
        frame.put_u32(self.config.top);
        frame.put_u32(self.config.width);
        frame.put_u32(self.config.height);
        self.sequence += 1;
        Ok(Some(frame.freeze()))
    }
}

/// Handle to a running capture task.
pub struct CapturePump {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl CapturePump {
    pub fn spawn<S, W>(source: S, writer: Arc<W>, config: CaptureConfig) -> Self
    where
        S: FrameSource,
        W: SampleWriter + ?Sized,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(pump(source, writer, config, stop_rx));
        Self { stop_tx, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops capture and returns the number of frames written.
    pub async fn stop(self) -> u64 {
        self.stop_tx.send_replace(true);
        match self.task.await {
            Ok(sent) => sent,
            Err(e) => {
                warn!("Capture task ended abnormally: {}", e);
                0
            }
        }
    }
}

async fn pump<S, W>(
    mut source: S,
    writer: Arc<W>,
    config: CaptureConfig,
    mut stop: watch::Receiver<bool>,
) -> u64
where
    S: FrameSource,
    W: SampleWriter + ?Sized,
{
    let frame_interval = config.frame_interval();
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Capturing {}x{} at ({}, {}), {} fps",
        config.width, config.height, config.left, config.top, config.frame_rate
    );

    let mut sent = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stopped(&mut stop) => break,
        }

        let frame = match source.grab().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("Capture source ended");
                break;
            }
            Err(e) => {
                error!("Screen capture failed: {:#}", e);
                break;
            }
        };

        if let Err(e) = writer.write_frame(frame, frame_interval).await {
            warn!("Dropping frame {}: {:#}", sent, e);
            continue;
        }
        sent += 1;
    }

    debug!("Capture stopped after {} frames", sent);
    sent
}
