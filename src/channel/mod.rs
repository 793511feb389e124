//! Log output channels
//!
//! Every output target implements [`Channel`]. File channels are built by
//! composing a [`Layout`] (which directory and file an event goes to) with an
//! [`EntryFormat`] (how the event is written there):
//!
//! | channel                | layout                                        | format        |
//! |------------------------|-----------------------------------------------|---------------|
//! | [`FlatFileChannel`]    | `storage/<file_name>`                         | text line     |
//! | [`ChunkedFileChannel`] | `storage/<level>/<chunk>.log`                 | text line     |
//! | [`JsonLogChannel`]     | `storage/json/<chunk>.log`                    | JSON document |
//! | [`TypedJsonLogChannel`]| `storage/json/<level>/<module>/<action>/<chunk>.log` | JSON document |

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::event::LogEvent;
use crate::metrics::MetricsSnapshot;

mod chunked;
#[cfg(feature = "console")]
mod console;
mod file;
mod format;
mod json;
mod layout;
mod sink;

pub use chunked::ChunkedFileChannel;
#[cfg(feature = "console")]
pub use self::console::ConsoleChannel;
pub use file::FlatFileChannel;
pub use format::{EntryFormat, JsonLogEntry, LogDocument};
pub use json::{JsonLogChannel, TypedJsonLogChannel};
pub use layout::{sanitize_segment, Layout};

/// An independent log output target
#[async_trait]
pub trait Channel: Send + Sync + fmt::Debug {
    /// Identifier of the channel; not required to be unique
    fn name(&self) -> &str;

    /// Whether the channel renders to an interactive console
    fn is_terminal(&self) -> bool {
        false
    }

    /// Write one event. Failures are returned to the caller, never retried.
    async fn log(&self, event: &LogEvent) -> Result<()>;

    /// Write metrics, for channels that collect them
    fn metrics(&self) -> Option<MetricsSnapshot> {
        None
    }
}
