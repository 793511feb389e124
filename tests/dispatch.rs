use std::path::Path;
use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use chunklog::channel::LogDocument;
use chunklog::{
    Channel, ChannelConfig, ChunkedFileChannel, FixedClock, FlatFileChannel, JsonLogChannel,
    LogLevel, Logger, RotationMode, TypedJsonLogChannel,
};
use serde_json::json;
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    let instant = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 10, 9, 15, 0)
        .unwrap();
    Arc::new(FixedClock::new(instant))
}

fn file_channels(storage: &Path) -> anyhow::Result<Vec<Arc<dyn Channel>>> {
    let config = ChannelConfig::new().with_storage_path(storage).with_chunk(RotationMode::Daily);

    Ok(vec![
        Arc::new(FlatFileChannel::new(config.clone())?.with_clock(clock())),
        Arc::new(ChunkedFileChannel::new(config.clone())?.with_clock(clock())),
        Arc::new(JsonLogChannel::new(config.clone())?.with_clock(clock())),
        Arc::new(TypedJsonLogChannel::new(config)?.with_clock(clock())),
    ])
}

#[test_log::test(tokio::test)]
async fn every_file_channel_receives_the_event() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let storage = temp_dir.path();
    let logger = Logger::with_channels(file_channels(storage)?);

    logger.warn("app", "boot", "booting app").await?;
    logger.info("db", "Connect", json!({"host": "localhost"})).await?;

    let flat = std::fs::read_to_string(storage.join("app.log"))?;
    let lines: Vec<&str> = flat.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "[10-03-2024 09:15:00] [warn] [app][boot]: booting app");
    assert_eq!(lines[1], r#"[10-03-2024 09:15:00] [info] [db][Connect]: {"host":"localhost"}"#);

    let warn_chunk = std::fs::read_to_string(storage.join("warn").join("10-03-2024.log"))?;
    assert_eq!(warn_chunk.trim_end(), "[10-03-2024 09:15:00] [app][boot]: booting app");
    assert!(storage.join("info").join("10-03-2024.log").exists());

    let document = LogDocument::read(&storage.join("json").join("10-03-2024.log")).await?;
    assert_eq!(document.date, "10-03-2024");
    let entries = document.entries()?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].level, Some(LogLevel::Warn));
    assert_eq!(entries[1].message, json!({"host": "localhost"}));

    let typed = storage
        .join("json")
        .join("info")
        .join("db")
        .join("connect")
        .join("10-03-2024.log");
    let entries = LogDocument::read(&typed).await?.entries()?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, None);
    assert_eq!(entries[0].action, "Connect");
    Ok(())
}

#[tokio::test]
async fn failing_channel_is_reported_without_blocking_others() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory")?;

    let broken: Arc<dyn Channel> = Arc::new(
        ChunkedFileChannel::new(ChannelConfig::new().with_storage_path(&blocker))?
            .with_name("broken")
            .with_clock(clock()),
    );
    let healthy: Arc<dyn Channel> = Arc::new(
        FlatFileChannel::new(ChannelConfig::new().with_storage_path(temp_dir.path().join("ok")))?
            .with_clock(clock()),
    );
    let logger = Logger::with_channels(vec![broken, Arc::clone(&healthy)]);

    let err = logger.error("app", "crash", "disk full").await.unwrap_err();
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].channel, "broken");

    let content = std::fs::read_to_string(temp_dir.path().join("ok").join("app.log"))?;
    assert!(content.contains("[error] [app][crash]: disk full"));
    assert_eq!(healthy.metrics().map(|m| m.entries_written), Some(1));
    Ok(())
}

#[tokio::test]
async fn global_logger_uses_the_registered_channels() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = ChannelConfig::new()
        .with_storage_path(temp_dir.path())
        .with_file_name("global.log");
    let channel: Arc<dyn Channel> = Arc::new(FlatFileChannel::new(config)?.with_clock(clock()));
    chunklog::set_channels(vec![channel]);

    chunklog::log("app", "boot", "global", LogLevel::Success).await?;
    assert!(!chunklog::logger().has_terminal_channel());

    let content = std::fs::read_to_string(temp_dir.path().join("global.log"))?;
    assert_eq!(content.trim_end(), "[10-03-2024 09:15:00] [success] [app][boot]: global");

    chunklog::set_channels(Vec::new());
    Ok(())
}
