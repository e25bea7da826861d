//! File-backed stream.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};

use super::{Stream, StreamMetadata, StreamMode};

static SCRATCH_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Stream backed by a file on disk.
///
/// A stream opened in any writable mode treats its file as scratch space:
/// [`Stream::close`] deletes the backing file. Opened read-only, the file is
/// left alone.
#[derive(Debug)]
pub struct FileStream {
    path: PathBuf,
    file: Option<File>,
    mode: StreamMode,
    pos: u64,
    blocked: bool,
}

impl FileStream {
    /// Open `path` with the given mode.
    pub fn open(path: impl AsRef<Path>, mode: StreamMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = Self::open_options(mode).open(&path)?;

        Ok(Self {
            path,
            file: Some(file),
            mode,
            pos: 0,
            blocked: false,
        })
    }

    /// Create a scratch file under `$TMPDIR/streams` and open it with the
    /// given mode. The generated name carries a `YYYYMMDD-HH00-` prefix so
    /// leftover files date themselves.
    pub fn scratch(mode: StreamMode) -> Result<Self> {
        let dir = std::env::temp_dir().join("streams");
        fs::create_dir_all(&dir)?;

        let prefix = chrono::Local::now().format("%Y%m%d-%H00-");
        let serial = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!("{prefix}{}-{serial}.tmp", std::process::id());
        let path = dir.join(name);

        File::create(&path)?;

        Self::open(path, mode)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_options(mode: StreamMode) -> OpenOptions {
        let mut options = OpenOptions::new();
        match mode {
            StreamMode::Read => options.read(true),
            StreamMode::Write => options.write(true).create(true).truncate(true),
            StreamMode::Append => options.append(true).create(true),
            StreamMode::Exclusive => options.write(true).create_new(true),
            StreamMode::Create => options.write(true).create(true),
        };
        options
    }

    fn handle(&mut self) -> Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| Error::stream("stream is closed"))
    }
}

impl Stream for FileStream {
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(Error::stream("not readable stream"));
        }

        let file = self.handle()?;
        let mut chunk = Vec::with_capacity(n.min(64 * 1024));
        std::io::Read::by_ref(file).take(n as u64).read_to_end(&mut chunk)?;
        self.pos += chunk.len() as u64;

        Ok(chunk)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.is_writable() {
            return Err(Error::stream("Cannot write to this stream"));
        }

        let append = self.mode == StreamMode::Append;
        let file = self.handle()?;
        file.write_all(data)?;
        if append {
            // append mode lands at the end regardless of position
            self.pos = file.stream_position()?;
        } else {
            self.pos += data.len() as u64;
        }

        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        if !self.is_seekable() {
            return Err(Error::stream("not seekable stream"));
        }

        let size = self.size().unwrap_or(0) as i128;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => self.pos as i128 + i128::from(offset),
            SeekFrom::End(offset) => size + i128::from(offset),
        };
        let clamped = target.clamp(0, size) as u64;

        let file = self.handle()?;
        file.seek(SeekFrom::Start(clamped))?;
        self.pos = clamped;

        Ok(())
    }

    fn tell(&self) -> u64 {
        self.pos
    }

    fn eof(&self) -> bool {
        self.pos >= self.size().unwrap_or(0)
    }

    fn size(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|meta| meta.len())
    }

    fn contents(&mut self) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(Error::stream("not readable stream"));
        }

        let file = self.handle()?;
        let mut rest = Vec::new();
        file.read_to_end(&mut rest)?;
        self.pos += rest.len() as u64;

        Ok(rest)
    }

    fn close(&mut self) {
        if self.blocked {
            return;
        }

        drop(self.file.take());
        self.blocked = true;

        if self.mode.is_write_only() {
            if let Err(error) = fs::remove_file(&self.path) {
                tracing::warn!(
                    target: "plainhttp",
                    "Could not delete stream {}: {error}",
                    self.path.display()
                );
            }
        }
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

        match fs::read(&self.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        }
    }

    fn metadata(&self) -> StreamMetadata {
        let size = self.size().unwrap_or(0);
        StreamMetadata {
            blocked: self.blocked,
            eof: self.eof(),
            mode: self.mode.to_string(),
            seekable: self.is_seekable(),
            stream_type: "simple/file".to_string(),
            unread_bytes: size.saturating_sub(self.pos),
            uri: self.path.display().to_string(),
        }
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        if !self.blocked {
            self.close();
        }
    }
}
