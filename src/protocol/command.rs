//! Command definitions
//!
//! Represents parsed commands from clients.

use crate::engine::{ActionType, Kv};

/// A parsed command
///
/// `kv.value` is empty for GET and DEL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: ActionType,
    pub kv: Kv,
}

impl Command {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action: ActionType::Set,
            kv: Kv::new(key, value),
        }
    }

    pub fn get(key: impl Into<String>) -> Self {
        Self {
            action: ActionType::Get,
            kv: Kv::new(key, String::new()),
        }
    }

    pub fn del(key: impl Into<String>) -> Self {
        Self {
            action: ActionType::Del,
            kv: Kv::new(key, String::new()),
        }
    }
}
