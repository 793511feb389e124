//! Configuration for file channels
//!
//! A channel is built from a [`ChannelConfig`]. Partial configuration is
//! expressed with [`ChannelConfigOverrides`] and applied with
//! [`ChannelConfig::merge`]: the merge is shallow, except for the date format,
//! which is merged field by field so a partial override keeps the unset
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rotation::{validate_file_name_pattern, validate_pattern, RotationMode};

/// Default base directory for log storage, relative to the working directory
pub const DEFAULT_STORAGE_PATH: &str = "storage/logs";

/// Default file name of the flat file channel
pub const DEFAULT_FILE_NAME: &str = "app.log";

/// strftime patterns used to render dates, times and month file names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormat {
    /// Date pattern, used in lines, JSON entries and daily/hourly file names
    pub date: String,
    /// Time pattern, used in lines and JSON entries
    pub time: String,
    /// Month pattern, used for monthly file names
    pub month: String,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            date: "%d-%m-%Y".to_string(),
            time: "%H:%M:%S".to_string(),
            month: "%m".to_string(),
        }
    }
}

impl DateFormat {
    /// Set the date pattern
    pub fn with_date(mut self, pattern: impl Into<String>) -> Self {
        self.date = pattern.into();
        self
    }

    /// Set the time pattern
    pub fn with_time(mut self, pattern: impl Into<String>) -> Self {
        self.time = pattern.into();
        self
    }

    /// Set the month pattern
    pub fn with_month(mut self, pattern: impl Into<String>) -> Self {
        self.month = pattern.into();
        self
    }

    /// Pattern for the combined `date time` stamp written in text lines
    pub fn stamp_pattern(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    /// Apply partial overrides field by field
    pub fn merge(&self, overrides: &DateFormatOverrides) -> Self {
        Self {
            date: overrides.date.clone().unwrap_or_else(|| self.date.clone()),
            time: overrides.time.clone().unwrap_or_else(|| self.time.clone()),
            month: overrides.month.clone().unwrap_or_else(|| self.month.clone()),
        }
    }

    /// Validate every pattern
    pub fn validate(&self) -> Result<()> {
        validate_file_name_pattern("date", &self.date)?;
        validate_pattern("time", &self.time)?;
        validate_file_name_pattern("month", &self.month)?;
        Ok(())
    }
}

/// Partial date format; `None` keeps the current pattern
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormatOverrides {
    /// Date pattern override
    pub date: Option<String>,
    /// Time pattern override
    pub time: Option<String>,
    /// Month pattern override
    pub month: Option<String>,
}

/// Configuration of a file channel, immutable once the channel is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Base directory for log storage
    pub storage_path: PathBuf,
    /// Rotation mode for chunked channels
    pub chunk: RotationMode,
    /// Date, time and month patterns
    pub date_format: DateFormat,
    /// File name used by the flat file channel
    pub file_name: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            chunk: RotationMode::default(),
            date_format: DateFormat::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ChannelConfig {
    /// Create a new channel configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base directory for storage
    pub fn with_storage_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the rotation mode
    pub fn with_chunk(mut self, chunk: RotationMode) -> Self {
        self.chunk = chunk;
        self
    }

    /// Set the date format
    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    /// Set the flat file name
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Apply partial overrides on top of this configuration
    pub fn merge(&self, overrides: &ChannelConfigOverrides) -> Self {
        Self {
            storage_path: overrides
                .storage_path
                .clone()
                .unwrap_or_else(|| self.storage_path.clone()),
            chunk: overrides.chunk.unwrap_or(self.chunk),
            date_format: match &overrides.date_format {
                Some(date_format) => self.date_format.merge(date_format),
                None => self.date_format.clone(),
            },
            file_name: overrides
                .file_name
                .clone()
                .unwrap_or_else(|| self.file_name.clone()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(Error::config("Storage path must not be empty"));
        }

        if self.file_name.is_empty() {
            return Err(Error::config("File name must not be empty"));
        }

        if self.file_name.contains(['/', '\\']) {
            return Err(Error::config(format!(
                "File name must not contain path separators: {}",
                self.file_name
            )));
        }

        if self.file_name.chars().all(|c| c == '.') {
            return Err(Error::config(format!("Invalid file name: {}", self.file_name)));
        }

        self.date_format.validate()
    }

    /// Path of the flat log file
    pub fn file_path(&self) -> PathBuf {
        self.storage_path.join(&self.file_name)
    }
}

/// Partial channel configuration; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfigOverrides {
    /// Base directory override
    pub storage_path: Option<PathBuf>,
    /// Rotation mode override
    pub chunk: Option<RotationMode>,
    /// Date format overrides, merged field by field
    pub date_format: Option<DateFormatOverrides>,
    /// Flat file name override
    pub file_name: Option<String>,
}

impl ChannelConfigOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base directory
    pub fn storage_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Override the rotation mode
    pub fn chunk(mut self, chunk: RotationMode) -> Self {
        self.chunk = Some(chunk);
        self
    }

    /// Override the date pattern
    pub fn date(mut self, pattern: impl Into<String>) -> Self {
        self.date_format.get_or_insert_with(Default::default).date = Some(pattern.into());
        self
    }

    /// Override the time pattern
    pub fn time(mut self, pattern: impl Into<String>) -> Self {
        self.date_format.get_or_insert_with(Default::default).time = Some(pattern.into());
        self
    }

    /// Override the month pattern
    pub fn month(mut self, pattern: impl Into<String>) -> Self {
        self.date_format.get_or_insert_with(Default::default).month = Some(pattern.into());
        self
    }

    /// Override the flat file name
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Parse overrides from a JSON document, rejecting unknown rotation modes
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid channel configuration: {}", e)))
    }
}
