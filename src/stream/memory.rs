//! In-memory stream.

use std::io::SeekFrom;

use crate::error::{Error, Result};

use super::{Stream, StreamMetadata, StreamMode};

/// Byte buffer held entirely in memory.
///
/// Writes always append to the logical body; arbitrary-offset overwrite is
/// not supported.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    body: Vec<u8>,
    pos: usize,
    mode: StreamMode,
    blocked: bool,
}

impl MemoryStream {
    /// Read-only stream over `body`.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self::with_mode(body, StreamMode::Read)
    }

    /// Stream over `body` with an explicit mode.
    #[must_use]
    pub fn with_mode(body: impl Into<Vec<u8>>, mode: StreamMode) -> Self {
        Self {
            body: body.into(),
            pos: 0,
            mode,
            blocked: false,
        }
    }

    /// Empty read-only stream.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl Stream for MemoryStream {
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(Error::stream("not readable stream"));
        }

        let end = self.body.len().min(self.pos.saturating_add(n));
        let chunk = self.body[self.pos..end].to_vec();
        self.pos = end;

        Ok(chunk)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.is_writable() {
            return Err(Error::stream("Cannot write to this stream"));
        }

        self.body.extend_from_slice(data);

        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        if !self.is_seekable() {
            return Err(Error::stream("not seekable stream"));
        }

        let size = self.body.len() as i128;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => self.pos as i128 + i128::from(offset),
            SeekFrom::End(offset) => size + i128::from(offset),
        };
        self.pos = target.clamp(0, size) as usize;

        Ok(())
    }

    fn tell(&self) -> u64 {
        self.pos as u64
    }

    fn eof(&self) -> bool {
        self.pos >= self.body.len()
    }

    fn size(&self) -> Option<u64> {
        Some(self.body.len() as u64)
    }

    fn contents(&mut self) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(Error::stream("not readable stream"));
        }

        let rest = self.body[self.pos..].to_vec();
        self.pos = self.body.len();

        Ok(rest)
    }

    fn close(&mut self) {
        self.body.clear();
        self.blocked = true;
    }

    fn is_readable(&self) -> bool {
        !self.blocked && !self.mode.is_write_only()
    }

    fn is_writable(&self) -> bool {
        !self.blocked && self.mode != StreamMode::Read
    }

    fn is_seekable(&self) -> bool {
        !self.blocked
    }

    fn text(&self) -> String {
        if !self.is_readable() {
            return "not readable stream".to_string();
        }

        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn metadata(&self) -> StreamMetadata {
        let size = self.body.len() as u64;
        StreamMetadata {
            blocked: self.blocked,
            eof: self.eof(),
            mode: self.mode.to_string(),
            seekable: self.is_seekable(),
            stream_type: "simple/memory".to_string(),
            unread_bytes: size.saturating_sub(self.pos as u64),
            uri: "mem://".to_string(),
        }
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        if !self.blocked {
            self.close();
        }
    }
}
