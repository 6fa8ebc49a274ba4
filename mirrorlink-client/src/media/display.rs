//! Receiver-side display pipeline.
//!
//! Each attached track gets a reader task that pushes frames into one
//! bounded queue. A single consumer task drains the queue into the
//! [`FrameSink`]. When the queue is full the newest frame is dropped so a
//! slow display never stalls track reading.

use crate::media::MediaFrame;
use crate::shutdown::stopped;
use crate::transport::RemoteTrack;
use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const FRAME_QUEUE_CAPACITY: usize = 64;

/// Where decoded video ends up.
pub trait FrameSink: Send + 'static {
    fn render(&mut self, frame: &MediaFrame) -> Result<()>;

    /// Called exactly once when the pipeline stops.
    fn release(&mut self);
}

/// Sink that only logs frame arrivals.
#[derive(Debug, Default)]
pub struct LogSink {
    frames: u64,
}

impl FrameSink for LogSink {
    fn render(&mut self, frame: &MediaFrame) -> Result<()> {
        self.frames += 1;
        if self.frames == 1 || self.frames % 100 == 0 {
            debug!(
                "Frame {} from track {} ({} bytes, ts {})",
                self.frames,
                frame.track_id,
                frame.len(),
                frame.timestamp
            );
        }
        Ok(())
    }

    fn release(&mut self) {
        info!("Display closed after {} frames", self.frames);
    }
}

struct SinkGuard(Box<dyn FrameSink>);

impl Drop for SinkGuard {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// Counters shared with the pipeline tasks.
#[derive(Debug, Default)]
pub struct DisplayStats {
    rendered: AtomicU64,
    dropped: AtomicU64,
}

impl DisplayStats {
    pub fn rendered(&self) -> u64 {
        self.rendered.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

pub struct DisplayPipeline {
    frame_tx: mpsc::Sender<MediaFrame>,
    stop_tx: watch::Sender<bool>,
    stats: Arc<DisplayStats>,
    consumer: JoinHandle<()>,
    readers: Vec<JoinHandle<()>>,
}

impl DisplayPipeline {
    /// Starts the consumer task. Must be called inside a tokio runtime.
    pub fn spawn(sink: Box<dyn FrameSink>) -> Self {
        let (frame_tx, frame_rx) = mpsc::channel(FRAME_QUEUE_CAPACITY);
        let (stop_tx, stop_rx) = watch::channel(false);
        let stats = Arc::new(DisplayStats::default());

        let consumer = tokio::spawn(consume(
            SinkGuard(sink),
            frame_rx,
            stop_rx,
            Arc::clone(&stats),
        ));

        Self {
            frame_tx,
            stop_tx,
            stats,
            consumer,
            readers: Vec::new(),
        }
    }

    /// Starts reading `track` into the display queue.
    pub fn attach(&mut self, track: Arc<dyn RemoteTrack>) {
        info!("Displaying {} track {}", track.kind(), track.id());
        let reader = tokio::spawn(read_track(
            track,
            self.frame_tx.clone(),
            self.stop_tx.subscribe(),
            Arc::clone(&self.stats),
        ));
        self.readers.push(reader);
    }

    pub fn track_count(&self) -> usize {
        self.readers.len()
    }

    pub fn stats(&self) -> Arc<DisplayStats> {
        Arc::clone(&self.stats)
    }

    /// Stops every task and waits for the sink to be released.
    pub async fn shutdown(self) {
        self.stop_tx.send_replace(true);
        for reader in self.readers {
            let _ = reader.await;
        }
        if let Err(e) = self.consumer.await {
            warn!("Display consumer ended abnormally: {}", e);
        }
    }
}

async fn consume(
    mut sink: SinkGuard,
    mut frames: mpsc::Receiver<MediaFrame>,
    mut stop: watch::Receiver<bool>,
    stats: Arc<DisplayStats>,
) {
    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                match sink.0.render(&frame) {
                    Ok(()) => {
                        stats.rendered.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => warn!("Failed to render frame from {}: {:#}", frame.track_id, e),
                }
            }
            _ = stopped(&mut stop) => break,
        }
    }
}

async fn read_track(
    track: Arc<dyn RemoteTrack>,
    frames: mpsc::Sender<MediaFrame>,
    mut stop: watch::Receiver<bool>,
    stats: Arc<DisplayStats>,
) {
    let track_id = track.id();
    loop {
        tokio::select! {
            frame = track.next_frame() => {
                let Some(frame) = frame else {
                    info!("Track {} ended", track_id);
                    break;
                };
                match frames.try_send(frame) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        stats.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
            _ = stopped(&mut stop) => break,
        }
    }
}
