use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

impl From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// One shipped log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub created: DateTime<Utc>,
    pub level: LogLevel,
    /// Emitting component, e.g. `mirror-sender`.
    pub name: String,
    /// Module path of the call site.
    pub target: String,
    pub message: String,
}

impl LogRecord {
    pub fn line(&self) -> String {
        self.line_in(&Local)
    }

    /// `2024-05-01 12:00:00,123 [INFO] message` with the timestamp in `tz`.
    pub fn line_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        format!(
            "{} [{}] {}",
            self.created.with_timezone(tz).format("%Y-%m-%d %H:%M:%S,%3f"),
            self.level,
            self.message
        )
    }
}
