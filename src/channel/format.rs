//! How file channels write an event
//!
//! Text formats append one line per event. Document formats keep a JSON
//! document per chunk file and rewrite it on every event; that read-modify-write
//! is not serialized, so concurrent writes to the same document can lose
//! entries.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::DateFormat;
use crate::error::{Error, Result};
use crate::event::{LogEvent, LINE_ENDING};
use crate::level::LogLevel;
use crate::metrics::MetricsCollector;
use crate::rotation::format_instant;
use crate::storage;

/// Entry written for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFormat {
    /// `[date time] [level] [module][action]: message`, level optional
    Line {
        /// Whether the level is part of the line
        include_level: bool,
    },
    /// An entry in a `{date, logs: [...]}` JSON document, level optional
    Document {
        /// Whether the entry carries a `level` field
        include_level: bool,
    },
}

impl EntryFormat {
    /// Render the text line for an event, line terminator included
    pub fn line(
        event: &LogEvent,
        now: &DateTime<FixedOffset>,
        date_format: &DateFormat,
        include_level: bool,
    ) -> Result<String> {
        let stamp = format_instant(now, &date_format.stamp_pattern())?;

        let mut line = format!("[{}] ", stamp);
        if include_level {
            line.push_str(&format!("[{}] ", event.level));
        }
        line.push_str(&format!(
            "[{}][{}]: {}{}",
            event.module,
            event.action,
            event.message.text_body(),
            LINE_ENDING
        ));

        Ok(line)
    }

    /// Write the event to `path`, returning the number of bytes written
    pub(crate) async fn write(
        &self,
        path: &Path,
        event: &LogEvent,
        now: &DateTime<FixedOffset>,
        date_format: &DateFormat,
        metrics: &MetricsCollector,
    ) -> Result<usize> {
        match *self {
            Self::Line { include_level } => {
                if !storage::file_exists(path).await? {
                    storage::touch(path).await?;
                    metrics.increment_files_created();
                    debug!(path = %path.display(), "created log file");
                }

                let line = Self::line(event, now, date_format, include_level)?;
                storage::append_file(path, line.as_bytes()).await?;
                trace!(path = %path.display(), bytes = line.len(), "appended log line");

                Ok(line.len())
            }
            Self::Document { include_level } => {
                if !storage::file_exists(path).await? {
                    let document = LogDocument::new(format_instant(now, &date_format.date)?);
                    storage::write_json_file(path, &document).await?;
                    metrics.increment_files_created();
                    debug!(path = %path.display(), "created log document");
                }

                let entry = JsonLogEntry::new(event, now, date_format, include_level)?;

                let mut document = LogDocument::read(path).await?;
                document.logs.push(serde_json::to_value(&entry)?);
                let bytes = storage::write_json_file(path, &document).await?;
                trace!(
                    path = %path.display(),
                    entries = document.logs.len(),
                    "rewrote log document"
                );

                Ok(bytes)
            }
        }
    }
}

/// A JSON log document: the date it was started and its entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDocument {
    /// Date the document was created, in the channel's date format
    pub date: String,
    /// Entries in write order
    pub logs: Vec<Value>,
    /// Any other top-level fields, preserved on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogDocument {
    /// Create an empty document
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            logs: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Read a document, reporting a malformed one as [`Error::Document`]
    pub async fn read(path: &Path) -> Result<Self> {
        storage::read_json_file(path).await.map_err(|err| match err {
            Error::Serialization(e) => Error::document(path, e.to_string()),
            other => other,
        })
    }

    /// Entries parsed as [`JsonLogEntry`] values
    pub fn entries(&self) -> Result<Vec<JsonLogEntry>> {
        self.logs
            .iter()
            .map(|value| serde_json::from_value(value.clone()).map_err(Error::from))
            .collect()
    }
}

/// One entry of a JSON log document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonLogEntry {
    /// Level, omitted where the directory already encodes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    /// Module that produced the event
    pub module: String,
    /// Action within the module
    pub action: String,
    /// Message text, error message or structured value
    pub message: Value,
    /// Date of the event
    pub date: String,
    /// Time of the event
    pub time: String,
    /// Stack trace; present only when the message is an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl JsonLogEntry {
    /// Build the entry for an event
    pub fn new(
        event: &LogEvent,
        now: &DateTime<FixedOffset>,
        date_format: &DateFormat,
        include_level: bool,
    ) -> Result<Self> {
        Ok(Self {
            level: include_level.then(|| event.level.clone()),
            module: event.module.clone(),
            action: event.action.clone(),
            message: event.message.json_value(),
            date: format_instant(now, &date_format.date)?,
            time: format_instant(now, &date_format.time)?,
            trace: event.message.as_error().map(|err| err.trace()),
        })
    }
}
