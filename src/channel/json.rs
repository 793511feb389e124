//! JSON document channels

use super::format::EntryFormat;
use super::layout::Layout;
use super::sink::{file_channel, FileSink};

/// Stores events as entries of a JSON document per chunk,
/// `storage_path/json/<chunk>.log`.
///
/// A new document starts as `{"date": <today>, "logs": []}`. Each event is
/// appended as `{level, module, action, message, date, time, trace?}` by
/// reading the document and rewriting it with 2-space indentation. Writes are
/// not serialized: concurrent events resolving to the same document can lose
/// entries.
#[derive(Debug)]
pub struct JsonLogChannel {
    name: String,
    sink: FileSink,
}

file_channel!(
    JsonLogChannel,
    "jsonFile",
    Layout::Json,
    EntryFormat::Document { include_level: true }
);

/// Like [`JsonLogChannel`], partitioned by level, module and action:
/// `storage_path/json/<level>/<module>/<action>/<chunk>.log`.
///
/// Module and action are lowercased and every segment is sanitized, so
/// caller-supplied names cannot leave the storage directory. Entries omit the
/// level, which the directory already encodes.
#[derive(Debug)]
pub struct TypedJsonLogChannel {
    name: String,
    sink: FileSink,
}

file_channel!(
    TypedJsonLogChannel,
    "jsonFileTyped",
    Layout::TypedJson,
    EntryFormat::Document { include_level: false }
);
