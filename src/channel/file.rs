//! Flat file channel

use super::format::EntryFormat;
use super::layout::Layout;
use super::sink::{file_channel, FileSink};

/// Appends every event as a line to one configured file,
/// `storage_path/file_name`.
///
/// Lines look like `[date time] [level] [module][action]: message`; an error
/// message is followed by a `[trace]` line and its stack.
#[derive(Debug)]
pub struct FlatFileChannel {
    name: String,
    sink: FileSink,
}

file_channel!(FlatFileChannel, "file", Layout::Flat, EntryFormat::Line { include_level: true });

impl FlatFileChannel {
    /// Path of the log file
    pub fn file_path(&self) -> std::path::PathBuf {
        self.sink.config().file_path()
    }
}
