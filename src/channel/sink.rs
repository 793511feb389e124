//! Shared core of the file channels

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::config::{ChannelConfig, ChannelConfigOverrides};
use crate::error::Result;
use crate::event::LogEvent;
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::storage;

use super::format::EntryFormat;
use super::layout::Layout;

/// A validated configuration plus the layout and format of one file channel
#[derive(Debug)]
pub(crate) struct FileSink {
    config: ChannelConfig,
    layout: Layout,
    format: EntryFormat,
    clock: Arc<dyn Clock>,
    metrics: MetricsCollector,
}

impl FileSink {
    pub(crate) fn new(config: ChannelConfig, layout: Layout, format: EntryFormat) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            layout,
            format,
            clock: Arc::new(SystemClock),
            metrics: MetricsCollector::new(),
        })
    }

    pub(crate) fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    /// Merge overrides into the current configuration, keeping it only if it validates
    pub(crate) fn configure(&mut self, overrides: &ChannelConfigOverrides) -> Result<()> {
        let config = self.config.merge(overrides);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub(crate) fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub(crate) fn target_path(&self, event: &LogEvent) -> Result<PathBuf> {
        self.layout.resolve(&self.config, event, &self.clock.now())
    }

    pub(crate) fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) async fn write(&self, event: &LogEvent) -> Result<()> {
        let start = Instant::now();

        match self.write_now(event).await {
            Ok(bytes) => {
                self.metrics.record_write(bytes, start.elapsed());
                Ok(())
            }
            Err(err) => {
                self.metrics.record_failure(&err);
                Err(err)
            }
        }
    }

    async fn write_now(&self, event: &LogEvent) -> Result<usize> {
        // one instant per event: file name, date and time always agree
        let now = self.clock.now();

        let directory = self.layout.directory(&self.config.storage_path, event);
        storage::ensure_directory(&directory).await?;

        let path = directory.join(self.layout.file_name(&self.config, &now)?);
        self.format
            .write(&path, event, &now, &self.config.date_format, &self.metrics)
            .await
    }
}

/// Builder methods and the [`Channel`](super::Channel) impl shared by every
/// file channel wrapping a `sink: FileSink` and a `name: String`
macro_rules! file_channel {
    ($channel:ident, $default_name:expr, $layout:expr, $format:expr) => {
        impl $channel {
            /// Default channel name
            pub const DEFAULT_NAME: &'static str = $default_name;

            /// Create the channel from a full configuration
            pub fn new(config: $crate::config::ChannelConfig) -> $crate::error::Result<Self> {
                Ok(Self {
                    name: Self::DEFAULT_NAME.to_string(),
                    sink: $crate::channel::sink::FileSink::new(config, $layout, $format)?,
                })
            }

            /// Create the channel from overrides merged over the defaults
            pub fn with_overrides(
                overrides: &$crate::config::ChannelConfigOverrides,
            ) -> $crate::error::Result<Self> {
                Self::new($crate::config::ChannelConfig::default().merge(overrides))
            }

            /// Set a custom name for the channel
            pub fn with_name(mut self, name: impl Into<String>) -> Self {
                self.name = name.into();
                self
            }

            /// Use another clock for file names, dates and times
            pub fn with_clock(mut self, clock: ::std::sync::Arc<dyn $crate::clock::Clock>) -> Self {
                self.sink.set_clock(clock);
                self
            }

            /// Merge overrides over the current configuration
            pub fn configure(
                mut self,
                overrides: &$crate::config::ChannelConfigOverrides,
            ) -> $crate::error::Result<Self> {
                self.sink.configure(overrides)?;
                Ok(self)
            }

            /// Current configuration
            pub fn config(&self) -> &$crate::config::ChannelConfig {
                self.sink.config()
            }

            /// File an event logged right now would be written to
            pub fn target_path(
                &self,
                event: &$crate::event::LogEvent,
            ) -> $crate::error::Result<::std::path::PathBuf> {
                self.sink.target_path(event)
            }
        }

        #[::async_trait::async_trait]
        impl $crate::channel::Channel for $channel {
            fn name(&self) -> &str {
                &self.name
            }

            async fn log(&self, event: &$crate::event::LogEvent) -> $crate::error::Result<()> {
                self.sink.write(event).await
            }

            fn metrics(&self) -> Option<$crate::metrics::MetricsSnapshot> {
                Some(self.sink.metrics())
            }
        }
    };
}

pub(crate) use file_channel;
