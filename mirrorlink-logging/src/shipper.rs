//! `tracing` layer that forwards events to the aggregator.
//!
//! Events are queued on a bounded channel and written by one background
//! task that owns the TCP connection. A full queue or an unreachable
//! aggregator drops records; logging never waits on the network.

use crate::framing::write_frame;
use crate::record::{LogLevel, LogRecord};
use chrono::Utc;
use std::fmt::{self, Write as _};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber, debug, warn};
use tracing_subscriber::layer::{Context, Layer};

const QUEUE_CAPACITY: usize = 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct ShippingLayer {
    name: String,
    tx: mpsc::Sender<LogRecord>,
}

impl ShippingLayer {
    /// Builds the layer and spawns the task that ships to `address`. Must be
    /// called inside a tokio runtime.
    pub fn spawn(address: impl Into<String>, name: impl Into<String>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let handle = tokio::spawn(ship(address.into(), rx));
        (
            Self {
                name: name.into(),
                tx,
            },
            handle,
        )
    }
}

impl<S: Subscriber> Layer<S> for ShippingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // The shipper's own diagnostics stay local.
        if metadata.target() == module_path!() {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            created: Utc::now(),
            level: LogLevel::from(metadata.level()),
            name: self.name.clone(),
            target: metadata.target().to_owned(),
            message: visitor.finish(),
        };
        let _ = self.tx.try_send(record);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }
}

async fn ship(address: String, mut rx: mpsc::Receiver<LogRecord>) {
    let mut connection: Option<TcpStream> = None;

    while let Some(record) = rx.recv().await {
        let payload = match serde_json::to_vec(&record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode log record: {}", e);
                continue;
            }
        };

        if connection.is_none() {
            connection = connect(&address).await;
        }
        let Some(stream) = connection.as_mut() else {
            continue;
        };

        if let Err(e) = write_frame(stream, &payload).await {
            warn!("Lost connection to log aggregator {}: {}", address, e);
            connection = None;
        }
    }
}

async fn connect(address: &str) -> Option<TcpStream> {
    match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => {
            debug!("Connected to log aggregator at {}", address);
            Some(stream)
        }
        Ok(Err(e)) => {
            debug!("Log aggregator {} unreachable: {}", address, e);
            None
        }
        Err(_) => {
            debug!("Timed out connecting to log aggregator {}", address);
            None
        }
    }
}
