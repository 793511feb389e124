//! Log levels
//!
//! Severity/category tags attached to every log event.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Severity or category of a log event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Diagnostic detail
    Debug,
    /// Normal operation
    Info,
    /// Something needs attention
    Warn,
    /// Something failed
    Error,
    /// Something completed successfully
    Success,
    /// A level outside the built-in set, rendered without decoration
    Custom(String),
}

impl LogLevel {
    /// Built-in levels, in ascending severity order except `Success`
    pub const BUILT_IN: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Success,
    ];

    /// Create a level outside the built-in set
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the name of the level
    pub fn name(&self) -> &str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Success => "success",
            Self::Custom(name) => name,
        }
    }

    /// Check if this is one of the built-in levels
    pub fn is_built_in(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            _ => Err(Error::config(format!("Unknown log level: {}", s))),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or(LogLevel::Custom(name)))
    }
}
