//! Central log sink: accepts shipped records from any number of processes
//! and appends them to one file.

use crate::error::LogShipError;
use crate::framing::read_frame;
use crate::record::LogRecord;
use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

pub struct Aggregator {
    listener: TcpListener,
    output: PathBuf,
}

impl Aggregator {
    pub async fn bind(address: &str, output: impl Into<PathBuf>) -> Result<Self> {
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind log aggregator to {address}"))?;
        Ok(Self::from_listener(listener, output))
    }

    pub fn from_listener(listener: TcpListener, output: impl Into<PathBuf>) -> Self {
        Self {
            listener,
            output: output.into(),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Accepts connections until `shutdown` resolves. Records already
    /// received are flushed to the file before returning.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)
            .await
            .with_context(|| format!("Failed to open {}", self.output.display()))?;
        info!(
            "Log aggregator listening on {}, writing to {}",
            self.listener.local_addr()?,
            self.output.display()
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_records(file, rx));
        let mut connections = JoinSet::new();

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(read_connection(stream, peer, tx.clone()));
                    }
                    Err(e) => warn!("Failed to accept log connection: {}", e),
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        info!("Log aggregator shutting down");
        connections.shutdown().await;
        drop(tx);
        writer.await.context("Log writer task failed")??;
        Ok(())
    }
}

async fn read_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    records: mpsc::UnboundedSender<LogRecord>,
) {
    debug!("Log source connected: {}", peer);
    loop {
        match read_frame(&mut stream).await {
            Ok(Some(payload)) => match serde_json::from_slice::<LogRecord>(&payload) {
                Ok(record) => {
                    if records.send(record).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Skipping malformed record from {}: {}", peer, e),
            },
            Ok(None) => {
                debug!("Log source disconnected: {}", peer);
                break;
            }
            Err(LogShipError::Io(e)) => {
                debug!("Log source {} went away: {}", peer, e);
                break;
            }
            Err(e) => {
                warn!("Dropping log source {}: {}", peer, e);
                break;
            }
        }
    }
}

async fn write_records(mut file: File, mut records: mpsc::UnboundedReceiver<LogRecord>) -> Result<()> {
    while let Some(record) = records.recv().await {
        let mut line = record.line();
        line.push('\n');
        if let Err(e) = file.write_all(line.as_bytes()).await {
            error!("Failed to write log line: {}", e);
            return Err(e.into());
        }
        file.flush().await?;
    }
    Ok(())
}
