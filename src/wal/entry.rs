//! WAL Entry definitions
//!
//! Defines the structure of log entries and the batch record codec.
//!
//! A record is the bincode encoding of a `Vec` of entries. bincode writes
//! the element count as part of the sequence encoding, so records can be
//! concatenated and decoded one after another without any extra framing.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::engine::ActionType;
use crate::error::{EmberError, Result};

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub action: ActionType,
    pub key: String,
    pub value: String,
}

impl LogEntry {
    pub fn new(action: ActionType, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action,
            key: key.into(),
            value: value.into(),
        }
    }

    /// A SET entry
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ActionType::Set, key, value)
    }

    /// A DEL entry (value is empty)
    pub fn del(key: impl Into<String>) -> Self {
        Self::new(ActionType::Del, key, String::new())
    }
}

/// On-disk form used for encoding, borrowing from the caller's batch
#[derive(Serialize)]
struct WireEntryRef<'a> {
    tag: u8,
    key: &'a str,
    value: &'a str,
}

/// On-disk form used for decoding
#[derive(Deserialize)]
struct WireEntry {
    tag: u8,
    key: String,
    value: String,
}

/// Encode a batch as one self-delimiting record
pub fn encode_batch(batch: &[LogEntry]) -> Result<Vec<u8>> {
    let wire: Vec<WireEntryRef<'_>> = batch
        .iter()
        .map(|entry| WireEntryRef {
            tag: entry.action.into(),
            key: &entry.key,
            value: &entry.value,
        })
        .collect();

    bincode::serialize(&wire).map_err(|e| EmberError::Encode(e.to_string()))
}

/// Decode every record in `data`, appending entries to `out` in order
///
/// Fails with `Decode` on a malformed or truncated record and with
/// `UnknownLogTag` on an entry whose tag is not a known action.
pub fn decode_batches(data: &[u8], out: &mut Vec<LogEntry>) -> Result<()> {
    let mut cursor = Cursor::new(data);

    while (cursor.position() as usize) < data.len() {
        let batch: Vec<WireEntry> = bincode::deserialize_from(&mut cursor)
            .map_err(|e| EmberError::Decode(e.to_string()))?;

        for wire in batch {
            out.push(LogEntry {
                action: ActionType::try_from(wire.tag)?,
                key: wire.key,
                value: wire.value,
            });
        }
    }

    Ok(())
}
