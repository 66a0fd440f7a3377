//! Write-ahead log
//!
//! Owns the active segment and the ids of retired segments. Every batch is
//! written as a single record and synced before `write` returns.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::WalConfig;
use crate::error::Result;

use super::entry::{decode_batches, encode_batch, LogEntry};
use super::segment::{parse_segment_id, Segment};

/// Id of the first segment in an empty directory
const FIRST_SEGMENT_ID: u64 = 1;

/// Segmented write-ahead log
///
/// Invariant: the active segment's id is greater than every retired id,
/// and retired ids are kept in ascending order.
pub struct Wal {
    dir: PathBuf,
    max_segment_size: u64,
    /// The only writable segment
    active: Segment,
    /// Older segments, still on disk, reopened only while reading
    retired: Vec<u64>,
}

impl Wal {
    /// Open the log in `config.dir`
    ///
    /// On startup:
    /// 1. Create the directory if needed
    /// 2. Collect every `<digits>.seg` file as a segment id
    /// 3. Open the highest id as active (or create segment 1)
    /// 4. Remember the rest as retired, ascending
    pub fn open(config: &WalConfig) -> Result<Self> {
        let dir = config.dir.clone();
        fs::create_dir_all(&dir)?;

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(id) = entry.file_name().to_str().and_then(parse_segment_id) {
                ids.push(id);
            }
        }
        ids.sort_unstable();

        let active_id = ids.pop().unwrap_or(FIRST_SEGMENT_ID);
        let active = Segment::open(&dir, active_id, config.max_segment_size)?;

        tracing::info!(
            dir = %dir.display(),
            active_segment = active_id,
            retired_segments = ids.len(),
            "WAL opened"
        );

        Ok(Self {
            dir,
            max_segment_size: config.max_segment_size,
            active,
            retired: ids,
        })
    }

    /// Append a batch as one record and sync it
    ///
    /// Rotates first if the record would overflow the active segment.
    /// An empty batch writes nothing.
    pub fn write(&mut self, batch: &[LogEntry]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let record = encode_batch(batch)?;

        if self.active.is_full(record.len()) {
            self.rotate()?;
        }

        self.active.write(&record)?;
        self.active.sync()?;

        tracing::debug!(
            entries = batch.len(),
            bytes = record.len(),
            segment = self.active.id(),
            "WAL batch written"
        );
        Ok(())
    }

    /// Start a new active segment with the next id
    ///
    /// The previous segment stays on disk and joins the retired set.
    pub fn rotate(&mut self) -> Result<()> {
        let next_id = self.active.id() + 1;
        let next = Segment::open(&self.dir, next_id, self.max_segment_size)?;

        let previous = std::mem::replace(&mut self.active, next);
        self.retired.push(previous.id());

        tracing::info!(
            retired_segment = previous.id(),
            active_segment = next_id,
            "WAL segment rotated"
        );
        Ok(())
    }

    /// Read every entry from every segment, oldest segment first
    ///
    /// Reading oldest-first keeps replay last-write-wins across rotations.
    pub fn read_segments(&self) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::new();

        for id in self.segment_ids() {
            let mut segment = Segment::reopen(&self.dir, id, self.max_segment_size)?;
            let data = segment.read()?;
            decode_batches(&data, &mut entries)?;
        }

        Ok(entries)
    }

    /// Sync and close the active segment
    pub fn close(mut self) -> Result<()> {
        self.active.sync()
    }

    /// All segment ids in ascending order (retired then active)
    pub fn segment_ids(&self) -> Vec<u64> {
        let mut ids = Vec::with_capacity(self.retired.len() + 1);
        ids.extend_from_slice(&self.retired);
        ids.push(self.active.id());
        ids
    }

    pub fn active_segment_id(&self) -> u64 {
        self.active.id()
    }

    pub fn active_segment_path(&self) -> &Path {
        self.active.path()
    }

    /// Tracked size of the active segment
    pub fn active_segment_size(&self) -> u64 {
        self.active.size()
    }

    pub fn retired_segment_ids(&self) -> &[u64] {
        &self.retired
    }
}
