//! Chunk file naming
//!
//! Maps a rotation mode and an instant to the name of the file that holds
//! events for that time window. Derivation is pure: the same mode, instant and
//! date format always produce the same name.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DateFormat;
use crate::error::{Error, Result};

/// Extension appended to every chunk file name
pub const LOG_EXTENSION: &str = "log";

/// How log files are chunked over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// One file per clock hour
    Hourly,
    /// One file per calendar day
    #[default]
    Daily,
    /// One file per month
    Monthly,
    /// One file per year
    Yearly,
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RotationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(Error::config(format!("Unknown rotation mode: {}", s))),
        }
    }
}

impl RotationMode {
    /// Get the name of the rotation mode
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Get all rotation modes
    pub fn all() -> [Self; 4] {
        [Self::Hourly, Self::Daily, Self::Monthly, Self::Yearly]
    }

    /// Name of the chunk file holding events logged at `now`.
    ///
    /// - hourly: `<date>-HH-00.log`
    /// - daily: `<date>.log`
    /// - monthly: `<month>.log`; a month-only pattern such as `%m` repeats
    ///   every year, so files from different years share a name
    /// - yearly: `YYYY.log`
    ///
    /// Fails only if a pattern in `format` is not a valid strftime pattern,
    /// which [`ChannelConfig::validate`](crate::config::ChannelConfig::validate)
    /// already rejects.
    pub fn file_name<Tz>(&self, now: &DateTime<Tz>, format: &DateFormat) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let stem = match self {
            Self::Hourly => format!("{}-{:02}-00", format_instant(now, &format.date)?, now.hour()),
            Self::Daily => format_instant(now, &format.date)?,
            Self::Monthly => format_instant(now, &format.month)?,
            Self::Yearly => format!("{:04}", now.year()),
        };

        Ok(format!("{}.{}", stem, LOG_EXTENSION))
    }

    /// Start of the time window containing `now`, in the instant's local time
    pub fn window_start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> NaiveDateTime {
        let local = now.naive_local();
        let date = local.date();

        let start = match self {
            Self::Hourly => date.and_hms_opt(local.hour(), 0, 0),
            Self::Daily => date.and_hms_opt(0, 0, 0),
            Self::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            Self::Yearly => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
            }
        };

        // every component comes from a valid date, so the window start always exists
        start.unwrap_or(local)
    }
}

/// Format an instant with a strftime pattern, failing instead of panicking on
/// an invalid pattern
pub fn format_instant<Tz>(instant: &DateTime<Tz>, pattern: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", instant.format(pattern))
        .map_err(|_| Error::config(format!("Invalid date pattern: {:?}", pattern)))?;
    Ok(out)
}

/// Check that a strftime pattern is non-empty and parses
pub(crate) fn validate_pattern(field: &str, pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(Error::config(format!("Date format '{}' must not be empty", field)));
    }

    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(Error::config(format!(
            "Date format '{}' is not a valid pattern: {:?}",
            field, pattern
        )));
    }

    Ok(())
}

/// Check that a pattern used in chunk file names renders a single path segment
pub(crate) fn validate_file_name_pattern(field: &str, pattern: &str) -> Result<()> {
    validate_pattern(field, pattern)?;

    // late in the year and day so every numeric field renders at full width
    let sample = NaiveDate::from_ymd_opt(2000, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| Error::config("Invalid sample instant"))?;
    let rendered = format_instant(&sample, pattern)?;

    if rendered.contains(['/', '\\']) || rendered.trim_matches('.').is_empty() {
        return Err(Error::config(format!(
            "Date format '{}' must render a single file name segment, got {:?} from {:?}",
            field, rendered, pattern
        )));
    }

    Ok(())
}
