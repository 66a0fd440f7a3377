//! Engine implementation
//!
//! HashMap-based table with a parking_lot RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::Kv;
use crate::error::{EmberError, Result};
use crate::sync::Context;

/// In-memory key-value table
///
/// ## Concurrency
/// - `get`: shared read lock, many readers at once
/// - `upsert` / `del` / `flush`: exclusive write lock
pub struct Engine {
    data: RwLock<HashMap<String, String>>,
}

impl Engine {
    /// Create a new empty engine
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or overwrite a key (last write wins)
    pub fn upsert(&self, ctx: &Context, kv: Kv) -> Result<()> {
        ctx.err()?;

        self.data.write().insert(kv.key, kv.value);
        Ok(())
    }

    /// Get the value for a key
    ///
    /// Returns `KeyNotFound` if the key is absent.
    pub fn get(&self, ctx: &Context, key: &str) -> Result<String> {
        ctx.err()?;

        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or(EmberError::KeyNotFound)
    }

    /// Remove a key. Removing an absent key succeeds.
    pub fn del(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.err()?;

        self.data.write().remove(key);
        Ok(())
    }

    /// Drop every entry (used before WAL replay)
    pub fn flush(&self) {
        self.data.write().clear();
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
