//! Time-chunked file channel

use super::format::EntryFormat;
use super::layout::Layout;
use super::sink::{file_channel, FileSink};

/// Appends every event as a line to a chunk file chosen by the rotation mode,
/// inside a directory per level: `storage_path/<level>/<chunk>.log`.
///
/// The level is encoded by the directory, so lines carry only
/// `[date time] [module][action]: message`.
#[derive(Debug)]
pub struct ChunkedFileChannel {
    name: String,
    sink: FileSink,
}

file_channel!(
    ChunkedFileChannel,
    "chunkFile",
    Layout::ByLevel,
    EntryFormat::Line { include_level: false }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::clock::FixedClock;
    use crate::config::{ChannelConfig, DateFormat};
    use crate::event::{ErrorValue, LogEvent};
    use crate::level::LogLevel;
    use crate::rotation::RotationMode;
    use chrono::{FixedOffset, TimeZone};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn clock(h: u32) -> Arc<FixedClock> {
        let instant = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 10, h, 15, 0)
            .unwrap();
        Arc::new(FixedClock::new(instant))
    }

    #[test_log::test(tokio::test)]
    async fn test_chunked_file_appends_in_call_order() -> crate::error::Result<()> {
        let temp_dir = tempdir()?;
        let channel =
            ChunkedFileChannel::new(ChannelConfig::new().with_storage_path(temp_dir.path()))?
                .with_clock(clock(9));

        let event = LogEvent::new("app", "boot", "booting app", LogLevel::Info);
        channel.log(&event).await?;
        channel.log(&event).await?;

        let path = temp_dir.path().join("info").join("10-03-2024.log");
        assert_eq!(channel.target_path(&event)?, path);

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec![
                "[10-03-2024 09:15:00] [app][boot]: booting app",
                "[10-03-2024 09:15:00] [app][boot]: booting app",
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_chunked_file_separates_levels_and_hours() -> crate::error::Result<()> {
        let temp_dir = tempdir()?;
        let config = ChannelConfig::new()
            .with_storage_path(temp_dir.path())
            .with_chunk(RotationMode::Hourly);

        let morning = ChunkedFileChannel::new(config.clone())?.with_clock(clock(9));
        let evening = ChunkedFileChannel::new(config)?.with_clock(clock(21));

        morning.log(&LogEvent::new("app", "a", "one", LogLevel::Warn)).await?;
        morning.log(&LogEvent::new("app", "b", "two", LogLevel::Debug)).await?;
        evening.log(&LogEvent::new("app", "c", "three", LogLevel::Warn)).await?;

        assert!(temp_dir.path().join("warn/10-03-2024-09-00.log").is_file());
        assert!(temp_dir.path().join("warn/10-03-2024-21-00.log").is_file());
        assert!(temp_dir.path().join("debug/10-03-2024-09-00.log").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_chunked_file_error_message() -> crate::error::Result<()> {
        let temp_dir = tempdir()?;
        let channel =
            ChunkedFileChannel::new(ChannelConfig::new().with_storage_path(temp_dir.path()))?
                .with_clock(clock(9));

        let error = ErrorValue::new("boom").with_stack("at foo...");
        channel.log(&LogEvent::new("app", "boot", error, LogLevel::Error)).await?;

        let content = std::fs::read_to_string(temp_dir.path().join("error/10-03-2024.log"))?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["[10-03-2024 09:15:00] [app][boot]: boom", "[trace]", "at foo..."]);
        Ok(())
    }

    #[tokio::test]
    async fn test_chunked_file_reports_io_failure() -> crate::error::Result<()> {
        let temp_dir = tempdir()?;
        // a regular file where the storage directory should be
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"")?;

        let channel = ChunkedFileChannel::new(ChannelConfig::new().with_storage_path(&blocker))?;
        let err = channel
            .log(&LogEvent::new("app", "boot", "x", LogLevel::Info))
            .await
            .unwrap_err();

        assert!(err.is_io_error());
        assert_eq!(channel.metrics().unwrap().failures, 1);
        Ok(())
    }

    #[test]
    fn test_chunked_file_rejects_nested_date_pattern() {
        let config = ChannelConfig::new()
            .with_date_format(DateFormat::default().with_date("%d/%m/%Y"));

        let err = ChunkedFileChannel::new(config).unwrap_err();
        assert!(err.is_config_error());
    }
}
