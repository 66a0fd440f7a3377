//! WAL segment file management
//!
//! Each segment is one append-only file. Segments are named by their id,
//! zero-padded so that lexicographic order matches numeric order:
//! `000000001.seg`, `000000002.seg`, ...

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};

use crate::error::Result;

/// Segment file extension
pub const SEGMENT_FILE_EXT: &str = ".seg";

/// Chunk size used when reading a segment back
const READ_CHUNK_SIZE: usize = 4096;

/// A WAL segment file
pub struct Segment {
    /// Segment id
    id: u64,
    /// File handle (append mode)
    file: File,
    /// Path to the segment file
    path: PathBuf,
    /// Bytes in the file, tracked as writes happen
    size: u64,
    /// Rotation threshold
    max_size: u64,
    /// Set when a torn write could not be cut off; no more appends
    sealed: bool,
}

impl Segment {
    /// Open a segment, creating the file if it does not exist
    pub fn open(dir: &Path, id: u64, max_size: u64) -> Result<Self> {
        let path = segment_path(dir, id);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let size = file.metadata()?.len();

        Ok(Self {
            id,
            file,
            path,
            size,
            max_size,
            sealed: false,
        })
    }

    /// Reopen an existing segment read-only (used for replay)
    pub fn reopen(dir: &Path, id: u64, max_size: u64) -> Result<Self> {
        let path = segment_path(dir, id);
        let file = OpenOptions::new().read(true).open(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            id,
            file,
            path,
            size,
            max_size,
            sealed: false,
        })
    }

    /// Append bytes and account for them in the tracked size
    ///
    /// A failed write leaves no partial record behind: bytes that reached
    /// the file are truncated away so the next record starts on a clean
    /// boundary.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < data.len() {
            match self.file.write(&data[written..]) {
                Ok(0) => {
                    let cause = io::Error::new(ErrorKind::WriteZero, "segment accepted no bytes");
                    return self.discard_partial(written, cause);
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return self.discard_partial(written, e),
            }
        }

        self.size += written as u64;
        Ok(())
    }

    /// Cut `written` torn bytes off the end of the file, then report `cause`
    fn discard_partial(&mut self, written: usize, cause: io::Error) -> Result<()> {
        if written > 0 {
            if let Err(e) = self.file.set_len(self.size) {
                tracing::error!(
                    segment = self.id,
                    torn_bytes = written,
                    "cannot truncate torn write: {}",
                    e
                );
                self.size += written as u64;
                self.sealed = true;
            }
        }
        Err(cause.into())
    }

    /// Force written bytes to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Read from the current position to end of file
    pub fn read(&mut self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.size as usize);
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            match self.file.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(buf.freeze())
    }

    /// True if appending `incoming` more bytes would exceed the max size,
    /// or if the segment was sealed after a torn write
    pub fn is_full(&self, incoming: usize) -> bool {
        self.sealed || self.size + incoming as u64 > self.max_size
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Tracked size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// File name for a segment id
pub fn segment_file_name(id: u64) -> String {
    format!("{:09}{}", id, SEGMENT_FILE_EXT)
}

/// Full path for a segment id
pub fn segment_path(dir: &Path, id: u64) -> PathBuf {
    dir.join(segment_file_name(id))
}

/// Parse `<digits>.seg` back into a segment id
pub fn parse_segment_id(file_name: &str) -> Option<u64> {
    let digits = file_name.strip_suffix(SEGMENT_FILE_EXT)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
