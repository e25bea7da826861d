//! Byte-stream abstraction backing request and response bodies.
//!
//! Two implementations are provided: [`MemoryStream`] (an in-memory buffer)
//! and [`FileStream`] (file-backed, optionally a self-deleting scratch
//! file). Both enforce the same capability model: a mode decides
//! readability/writability, and a `blocked` flag set by [`Stream::close`]
//! forbids every further operation.

use std::fmt;
use std::io::SeekFrom;

use serde::Serialize;

use crate::error::Result;

mod file;
mod memory;

pub use file::FileStream;
pub use memory::MemoryStream;

/// Open mode of a stream.
///
/// The write-only set is `{Write, Append, Exclusive, Create}`; every mode
/// except `Read` is writable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// Read only, position at start.
    Read,
    /// Write only, truncating any existing content.
    Write,
    /// Write only, every write lands at the end.
    Append,
    /// Write only, creation fails if the target already exists.
    Exclusive,
    /// Write only, existing content is kept.
    Create,
}

impl StreamMode {
    /// Single-letter rendering used in [`StreamMetadata`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StreamMode::Read => "r",
            StreamMode::Write => "w",
            StreamMode::Append => "a",
            StreamMode::Exclusive => "x",
            StreamMode::Create => "c",
        }
    }

    #[must_use]
    pub(crate) fn is_write_only(self) -> bool {
        !matches!(self, StreamMode::Read)
    }
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Introspection snapshot of a stream.
#[derive(Debug, Clone, Serialize)]
pub struct StreamMetadata {
    /// True once the stream has been closed.
    pub blocked: bool,
    /// True iff position >= size.
    pub eof: bool,
    /// Open mode, single-letter form.
    pub mode: String,
    /// Whether seeking is currently allowed.
    pub seekable: bool,
    /// Implementation identifier, e.g. `simple/memory`.
    pub stream_type: String,
    /// Bytes between the current position and the end.
    pub unread_bytes: u64,
    /// Backing location (`mem://` or a file path).
    pub uri: String,
}

/// Readable/writable/seekable byte buffer with explicit capability flags.
///
/// Invariants: position stays within `[0, size]` after any seek, read or
/// write; `eof` holds iff position >= size; `close` is idempotent and every
/// operation after it fails with a stream error.
pub trait Stream: fmt::Debug {
    /// Read up to `n` bytes from the current position.
    fn read(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Write `data`, returning the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Move the position; the target is clamped into `[0, size]`.
    fn seek(&mut self, pos: SeekFrom) -> Result<()>;

    /// Seek back to the start.
    fn rewind(&mut self) -> Result<()> {
        self.seek(SeekFrom::Start(0))
    }

    /// Current position.
    fn tell(&self) -> u64;

    /// True iff the position has reached or passed the end.
    fn eof(&self) -> bool;

    /// Total size in bytes, when known.
    fn size(&self) -> Option<u64>;

    /// Read all remaining bytes from the current position to the end.
    fn contents(&mut self) -> Result<Vec<u8>>;

    /// Close the stream. Idempotent; subsequent operations fail.
    fn close(&mut self);

    fn is_readable(&self) -> bool;
    fn is_writable(&self) -> bool;
    fn is_seekable(&self) -> bool;

    /// Whole-content snapshot that leaves the position untouched.
    /// Returns `"not readable stream"` when the stream is not readable.
    fn text(&self) -> String;

    /// Introspection snapshot.
    fn metadata(&self) -> StreamMetadata;
}
