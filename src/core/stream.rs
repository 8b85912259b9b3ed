//! Byte stream capability backing message bodies and uploaded files.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::{Error, Result};

/// Description of an open stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StreamMetadata {
    pub mode: String,
    pub seekable: bool,
    /// Backing file, if any.
    pub uri: Option<PathBuf>,
}

/// Readable, writable, seekable byte stream.
pub trait Stream: Send + fmt::Debug {
    /// Read up to `len` bytes.
    fn read(&mut self, len: usize) -> Result<Vec<u8>>;

    fn write(&mut self, data: &[u8]) -> Result<usize>;

    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    fn tell(&mut self) -> Result<u64>;

    /// Whether a previous read hit the end of the stream.
    fn eof(&self) -> bool;

    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    fn is_seekable(&self) -> bool;

    /// Size in bytes, `None` when unknown.
    fn size(&self) -> Option<u64>;

    /// Remaining content from the current position.
    fn contents(&mut self) -> Result<Vec<u8>>;

    fn metadata(&self) -> StreamMetadata;

    /// Release the underlying resource; later operations fail.
    fn close(&mut self);

    fn rewind(&mut self) -> Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

/// Access flags derived from an `fopen`-style mode such as `"r+b"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Mode {
    readable: bool,
    writable: bool,
}

fn open_options(mode: &str) -> Result<(OpenOptions, Mode)> {
    let plus = mode.contains('+');
    let mut options = OpenOptions::new();
    match mode.chars().next() {
        Some('r') => options.read(true).write(plus),
        Some('w') => options.read(plus).write(true).create(true).truncate(true),
        Some('a') => options.read(plus).append(true).create(true),
        Some('x') => options.read(plus).write(true).create_new(true),
        Some('c') => options.read(plus).write(true).create(true),
        _ => {
            return Err(Error::InvalidArgument(format!(
                "invalid stream mode \"{}\"",
                mode
            )))
        }
    };
    let readable = plus || mode.starts_with('r');
    let writable = plus || !mode.starts_with('r');
    Ok((options, Mode { readable, writable }))
}

/// [`Stream`] over a file.
#[derive(Debug)]
pub struct FileStream {
    file: Option<File>,
    path: Option<PathBuf>,
    mode: String,
    access: Mode,
    eof: bool,
}

impl FileStream {
    /// Open `path` with an `fopen`-style `mode` (`r`, `r+`, `w`, `w+`, `a`,
    /// `a+`, `x`, `x+`, `c`, `c+`, optionally with `b` or `t`).
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self> {
        let path = path.as_ref();
        let (options, access) = open_options(mode)?;
        let file = options.open(path)?;
        Ok(Self {
            file: Some(file),
            path: Some(path.to_path_buf()),
            mode: mode.to_string(),
            access,
            eof: false,
        })
    }

    /// Wrap an already open file; `mode` describes how it was opened.
    pub fn from_file(file: File, mode: &str) -> Result<Self> {
        let (_, access) = open_options(mode)?;
        Ok(Self {
            file: Some(file),
            path: None,
            mode: mode.to_string(),
            access,
            eof: false,
        })
    }

    fn file(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(Error::StreamDetached)
    }
}

impl Stream for FileStream {
    fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        if !self.access.readable {
            return Err(Error::StreamNotCapable("readable"));
        }
        let mut buf = Vec::with_capacity(len);
        let read = self.file()?.take(len as u64).read_to_end(&mut buf)?;
        if read < len {
            self.eof = true;
        }
        Ok(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.access.writable {
            return Err(Error::StreamNotCapable("writable"));
        }
        self.file()?.write_all(data)?;
        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let offset = self.file()?.seek(pos)?;
        self.eof = false;
        Ok(offset)
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.file()?.stream_position()?)
    }

    fn eof(&self) -> bool {
        self.file.is_none() || self.eof
    }

    fn is_readable(&self) -> bool {
        self.file.is_some() && self.access.readable
    }

    fn is_writable(&self) -> bool {
        self.file.is_some() && self.access.writable
    }

    fn is_seekable(&self) -> bool {
        self.file.is_some()
    }

    fn size(&self) -> Option<u64> {
        self.file
            .as_ref()
            .and_then(|file| file.metadata().ok())
            .map(|meta| meta.len())
    }

    fn contents(&mut self) -> Result<Vec<u8>> {
        if !self.access.readable {
            return Err(Error::StreamNotCapable("readable"));
        }
        let mut buf = Vec::new();
        self.file()?.read_to_end(&mut buf)?;
        self.eof = true;
        Ok(buf)
    }

    fn metadata(&self) -> StreamMetadata {
        StreamMetadata {
            mode: self.mode.clone(),
            seekable: self.is_seekable(),
            uri: self.path.clone(),
        }
    }

    fn close(&mut self) {
        self.file = None;
    }
}

/// In-memory [`Stream`].
#[derive(Debug)]
pub struct MemoryStream {
    buffer: Option<Cursor<Vec<u8>>>,
    eof: bool,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self {
            buffer: Some(Cursor::new(Vec::new())),
            eof: false,
        }
    }

    fn buffer(&mut self) -> Result<&mut Cursor<Vec<u8>>> {
        self.buffer.as_mut().ok_or(Error::StreamDetached)
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for MemoryStream {
    fn from(data: Vec<u8>) -> Self {
        Self {
            buffer: Some(Cursor::new(data)),
            eof: false,
        }
    }
}

impl From<String> for MemoryStream {
    fn from(data: String) -> Self {
        Self::from(data.into_bytes())
    }
}

impl From<&str> for MemoryStream {
    fn from(data: &str) -> Self {
        Self::from(data.as_bytes().to_vec())
    }
}

impl Stream for MemoryStream {
    fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len);
        let read = self.buffer()?.take(len as u64).read_to_end(&mut buf)?;
        if read < len {
            self.eof = true;
        }
        Ok(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(self.buffer()?.write(data)?)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let offset = self.buffer()?.seek(pos)?;
        self.eof = false;
        Ok(offset)
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.buffer()?.position())
    }

    fn eof(&self) -> bool {
        self.buffer.is_none() || self.eof
    }

    fn is_readable(&self) -> bool {
        self.buffer.is_some()
    }

    fn is_writable(&self) -> bool {
        self.buffer.is_some()
    }

    fn is_seekable(&self) -> bool {
        self.buffer.is_some()
    }

    fn size(&self) -> Option<u64> {
        self.buffer
            .as_ref()
            .map(|buffer| buffer.get_ref().len() as u64)
    }

    fn contents(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.buffer()?.read_to_end(&mut buf)?;
        self.eof = true;
        Ok(buf)
    }

    fn metadata(&self) -> StreamMetadata {
        StreamMetadata {
            mode: "w+b".to_string(),
            seekable: self.is_seekable(),
            uri: None,
        }
    }

    fn close(&mut self) {
        self.buffer = None;
    }
}
