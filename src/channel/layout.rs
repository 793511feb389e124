//! Target path resolution for file channels

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};

use crate::config::ChannelConfig;
use crate::error::Result;
use crate::event::LogEvent;

/// Sub-directory holding JSON documents
pub const JSON_DIRECTORY: &str = "json";

/// Where a file channel stores an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A single configured file directly under the storage path
    Flat,
    /// One directory per level, chunk files inside
    ByLevel,
    /// Chunk files under `json/`
    Json,
    /// Chunk files under `json/<level>/<module>/<action>/`
    TypedJson,
}

impl Layout {
    /// Directory the event is written to
    pub fn directory(&self, storage_path: &Path, event: &LogEvent) -> PathBuf {
        match self {
            Self::Flat => storage_path.to_path_buf(),
            Self::ByLevel => storage_path.join(sanitize_segment(event.level.name())),
            Self::Json => storage_path.join(JSON_DIRECTORY),
            Self::TypedJson => storage_path
                .join(JSON_DIRECTORY)
                .join(sanitize_segment(event.level.name()))
                .join(sanitize_segment(&event.module.to_lowercase()))
                .join(sanitize_segment(&event.action.to_lowercase())),
        }
    }

    /// File name inside the directory
    pub fn file_name(&self, config: &ChannelConfig, now: &DateTime<FixedOffset>) -> Result<String> {
        match self {
            Self::Flat => Ok(config.file_name.clone()),
            Self::ByLevel | Self::Json | Self::TypedJson => {
                config.chunk.file_name(now, &config.date_format)
            }
        }
    }

    /// Full path of the file the event is written to
    pub fn resolve(
        &self,
        config: &ChannelConfig,
        event: &LogEvent,
        now: &DateTime<FixedOffset>,
    ) -> Result<PathBuf> {
        let file_name = self.file_name(config, now)?;
        Ok(self.directory(&config.storage_path, event).join(file_name))
    }
}

/// Make a caller-supplied string safe to use as one directory name.
///
/// Keeps ASCII letters, digits, whitespace, `-`, `_` and `.`; everything else
/// (path separators, shell metacharacters, non-ASCII) is dropped. A result that
/// is empty or made only of dots becomes `_`, so a segment can never be `.` or `..`.
pub fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | '.'))
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}
