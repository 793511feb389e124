//! Dispatcher fanning each event out to the registered channels

use std::sync::{Arc, OnceLock};

use futures::future::join_all;
use parking_lot::RwLock;
use tracing::warn;

use crate::channel::Channel;
use crate::error::{ChannelFailure, Error, Result};
use crate::event::{LogEvent, LogMessage};
use crate::level::LogLevel;

/// Outcome of one channel during a dispatch
#[derive(Debug)]
pub struct ChannelOutcome {
    /// Name of the channel
    pub channel: String,
    /// What the channel reported
    pub result: Result<()>,
}

/// Outcomes of every channel for one event, in registration order
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// One outcome per registered channel
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    /// Check if every channel succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// Number of channels that failed
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err()).count()
    }

    /// `Ok` if every channel succeeded, otherwise [`Error::Dispatch`] with the failures
    pub fn into_result(self) -> Result<()> {
        let failures: Vec<ChannelFailure> = self
            .outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.result {
                Ok(()) => None,
                Err(error) => Some(ChannelFailure {
                    channel: outcome.channel,
                    error,
                }),
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Dispatch(failures))
        }
    }
}

/// Holds the active channels and forwards every event to all of them
#[derive(Debug, Default)]
pub struct Logger {
    channels: RwLock<Vec<Arc<dyn Channel>>>,
}

impl Logger {
    /// Create a logger without channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logger with an initial set of channels
    pub fn with_channels(channels: Vec<Arc<dyn Channel>>) -> Self {
        Self {
            channels: RwLock::new(channels),
        }
    }

    /// Replace every registered channel
    pub fn set_channels(&self, channels: Vec<Arc<dyn Channel>>) {
        *self.channels.write() = channels;
    }

    /// Snapshot of the registered channels, in registration order
    pub fn channels(&self) -> Vec<Arc<dyn Channel>> {
        self.channels.read().clone()
    }

    /// Check whether any registered channel writes to a terminal
    pub fn has_terminal_channel(&self) -> bool {
        self.channels.read().iter().any(|channel| channel.is_terminal())
    }

    /// Send an event to every channel and wait for all of them.
    ///
    /// Channels run concurrently and independently: a failing channel does not
    /// prevent the others from being attempted, and nothing is retried.
    pub async fn dispatch(&self, event: &LogEvent) -> DispatchReport {
        // the lock is not held across the writes
        let channels = self.channels();

        let outcomes = join_all(channels.iter().map(|channel| async move {
            let result = channel.log(event).await;
            if let Err(ref err) = result {
                warn!(
                    channel = channel.name(),
                    module = %event.module,
                    action = %event.action,
                    error = %err,
                    "log channel failed"
                );
            }

            ChannelOutcome {
                channel: channel.name().to_string(),
                result,
            }
        }))
        .await;

        DispatchReport { outcomes }
    }

    /// Log a message to every channel
    pub async fn log(
        &self,
        module: &str,
        action: &str,
        message: impl Into<LogMessage>,
        level: LogLevel,
    ) -> Result<()> {
        let event = LogEvent::new(module, action, message, level);
        self.dispatch(&event).await.into_result()
    }

    /// Log at debug level
    pub async fn debug(
        &self,
        module: &str,
        action: &str,
        message: impl Into<LogMessage>,
    ) -> Result<()> {
        self.log(module, action, message, LogLevel::Debug).await
    }

    /// Log at info level
    pub async fn info(
        &self,
        module: &str,
        action: &str,
        message: impl Into<LogMessage>,
    ) -> Result<()> {
        self.log(module, action, message, LogLevel::Info).await
    }

    /// Log at warn level
    pub async fn warn(
        &self,
        module: &str,
        action: &str,
        message: impl Into<LogMessage>,
    ) -> Result<()> {
        self.log(module, action, message, LogLevel::Warn).await
    }

    /// Log at error level
    pub async fn error(
        &self,
        module: &str,
        action: &str,
        message: impl Into<LogMessage>,
    ) -> Result<()> {
        self.log(module, action, message, LogLevel::Error).await
    }

    /// Log at success level
    pub async fn success(
        &self,
        module: &str,
        action: &str,
        message: impl Into<LogMessage>,
    ) -> Result<()> {
        self.log(module, action, message, LogLevel::Success).await
    }
}

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger, created without channels on first use
pub fn logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(Logger::new)
}

/// Replace the channels of the process-wide logger
pub fn set_channels(channels: Vec<Arc<dyn Channel>>) {
    logger().set_channels(channels);
}

/// Log a message through the process-wide logger
pub async fn log(
    module: &str,
    action: &str,
    message: impl Into<LogMessage>,
    level: LogLevel,
) -> Result<()> {
    logger().log(module, action, message, level).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records every event; fails when `fail` is set
    #[derive(Debug, Default)]
    struct Recorder {
        name: String,
        fail: bool,
        terminal: bool,
        seen: Mutex<Vec<LogEvent>>,
    }

    impl Recorder {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                ..Default::default()
            })
        }

        fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                fail: true,
                ..Default::default()
            })
        }
    }

    fn registry(recorders: &[&Arc<Recorder>]) -> Vec<Arc<dyn Channel>> {
        recorders
            .iter()
            .map(|recorder| Arc::clone(recorder) as Arc<dyn Channel>)
            .collect()
    }

    #[async_trait]
    impl Channel for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_terminal(&self) -> bool {
            self.terminal
        }

        async fn log(&self, event: &LogEvent) -> Result<()> {
            self.seen.lock().push(event.clone());
            if self.fail {
                let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
                return Err(Error::from(err));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_every_channel_receives_identical_event() {
        let a = Recorder::new("a");
        let b = Recorder::new("b");
        let logger = Logger::with_channels(registry(&[&a, &b]));

        logger.warn("app", "boot", "booting app").await.unwrap();

        let expected = LogEvent::new("app", "boot", "booting app", LogLevel::Warn);
        assert_eq!(a.seen.lock().as_slice(), &[expected.clone()]);
        assert_eq!(b.seen.lock().as_slice(), &[expected]);
    }

    #[tokio::test]
    async fn test_failing_channel_does_not_block_others() {
        let broken = Recorder::failing("broken");
        let healthy = Recorder::new("healthy");
        let logger = Logger::with_channels(registry(&[&broken, &healthy]));

        let event = LogEvent::new("app", "boot", "x", LogLevel::Info);
        let report = logger.dispatch(&event).await;
        assert!(!report.is_success());
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.outcomes[0].channel, "broken");
        assert_eq!(report.outcomes[1].channel, "healthy");
        assert_eq!(healthy.seen.lock().len(), 1);

        let err = logger.info("app", "boot", "x").await.unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].channel, "broken");
        assert!(err.failures()[0].error.is_io_error());
        assert_eq!(healthy.seen.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_set_channels_replaces_the_list() {
        let first = Recorder::new("first");
        let second = Recorder::new("second");
        let logger = Logger::with_channels(registry(&[&first]));

        logger.set_channels(registry(&[&second, &second]));
        logger.debug("m", "a", "x").await.unwrap();

        assert!(first.seen.lock().is_empty());
        assert_eq!(second.seen.lock().len(), 2);
        assert_eq!(
            logger.channels().iter().map(|c| c.name().to_string()).collect::<Vec<_>>(),
            vec!["second", "second"]
        );
    }

    #[tokio::test]
    async fn test_empty_logger_succeeds() {
        let logger = Logger::new();
        assert!(logger.success("m", "a", "x").await.is_ok());
        assert!(!logger.has_terminal_channel());
    }

    #[test]
    fn test_terminal_detection() {
        let terminal = Arc::new(Recorder {
            name: "tty".to_string(),
            terminal: true,
            ..Default::default()
        });
        let logger = Logger::with_channels(registry(&[&Recorder::new("file"), &terminal]));
        assert!(logger.has_terminal_channel());
    }
}
