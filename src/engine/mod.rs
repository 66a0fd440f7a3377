//! Engine Module
//!
//! In-memory key-value table.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Reader-writer locking: concurrent readers, exclusive writers
//! - Fail fast when the caller's context has already ended
//!
//! The engine has no durability of its own; `Storage` puts the WAL in
//! front of it and replays the log into it on startup.

mod table;

pub use table::Engine;

use crate::error::EmberError;

/// A key-value pair
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Kv {
    pub key: String,
    pub value: String,
}

impl Kv {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Kind of command, also used as the WAL entry tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionType {
    Set = 1,
    Get = 2,
    Del = 3,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Set => "SET",
            ActionType::Get => "GET",
            ActionType::Del => "DEL",
        }
    }
}

impl From<ActionType> for u8 {
    fn from(action: ActionType) -> Self {
        action as u8
    }
}

impl TryFrom<u8> for ActionType {
    type Error = EmberError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(ActionType::Set),
            2 => Ok(ActionType::Get),
            3 => Ok(ActionType::Del),
            other => Err(EmberError::UnknownLogTag(other)),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
