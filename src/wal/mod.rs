//! Write-Ahead Log (WAL) Module
//!
//! Provides durability guarantees through append-only logging.
//!
//! ## Responsibilities
//! - Append each flushed batch as one record, synced before returning
//! - Rotate to a new segment when the active one would overflow
//! - Read all segments back for crash recovery
//!
//! ## File Format
//! ```text
//! {dir}/
//!   ├── 000000001.seg   (retired)
//!   ├── 000000002.seg   (retired)
//!   └── 000000003.seg   (active)
//!
//! segment file:
//! ┌──────────────────────────────────────────────┐
//! │ Record 1: bincode Vec<{tag, key, value}>      │
//! ├──────────────────────────────────────────────┤
//! │ Record 2: bincode Vec<{tag, key, value}>      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Tags: 1 = SET, 2 = GET, 3 = DEL. There is no header or checksum; the
//! element count inside each record is what delimits it.

mod entry;
mod log;
mod segment;

pub use entry::{decode_batches, encode_batch, LogEntry};
pub use log::Wal;
pub use segment::{parse_segment_id, segment_file_name, segment_path, Segment, SEGMENT_FILE_EXT};
