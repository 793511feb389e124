//! # chunklog
//!
//! A pluggable logger: a [`Logger`] forwards every `(module, action, message,
//! level)` event to a list of independently configured [channels](channel):
//!
//! - [`ConsoleChannel`]: decorated, coloured lines on stdout
//! - [`FlatFileChannel`]: one text file
//! - [`ChunkedFileChannel`]: text files chunked by time and split by level
//! - [`JsonLogChannel`]: JSON documents chunked by time
//! - [`TypedJsonLogChannel`]: JSON documents split by level, module and action
//!
//! Chunk file names come from the channel's [`RotationMode`] (hourly, daily,
//! monthly or yearly) and its [`DateFormat`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chunklog::{
//!     Channel, ChannelConfig, ChunkedFileChannel, ConsoleChannel, LogLevel, RotationMode,
//! };
//!
//! # async fn run() -> chunklog::Result<()> {
//! let channels: Vec<Arc<dyn Channel>> = vec![
//!     Arc::new(ConsoleChannel::new()),
//!     Arc::new(ChunkedFileChannel::new(
//!         ChannelConfig::new()
//!             .with_storage_path("/var/log/app")
//!             .with_chunk(RotationMode::Hourly),
//!     )?),
//! ];
//! chunklog::set_channels(channels);
//!
//! chunklog::log("app", "boot", "booting app", LogLevel::Info).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The crate reports its own activity through `tracing`; it never installs a
//! subscriber.

pub mod channel;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod rotation;
pub mod storage;

pub use channel::{
    Channel, ChunkedFileChannel, FlatFileChannel, JsonLogChannel, TypedJsonLogChannel,
};
#[cfg(feature = "console")]
pub use channel::ConsoleChannel;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ChannelConfig, ChannelConfigOverrides, DateFormat, DateFormatOverrides};
pub use error::{ChannelFailure, Error, Result};
pub use event::{ErrorValue, LogEvent, LogMessage};
pub use level::LogLevel;
pub use logger::{log, logger, set_channels, ChannelOutcome, DispatchReport, Logger};
pub use metrics::MetricsSnapshot;
pub use rotation::RotationMode;
