//! Application layer
//!
//! Executes raw command text against a [`KeyValueStore`] and renders the
//! one-line response sent back to the client.

use std::sync::Arc;

use crate::engine::{ActionType, Engine, Kv};
use crate::error::{EmberError, Result};
use crate::protocol::Processor;
use crate::storage::Storage;
use crate::sync::Context;

/// Storage contract used by the command handler
pub trait KeyValueStore: Send + Sync {
    fn put(&self, ctx: &Context, kv: Kv) -> Result<()>;
    fn get(&self, ctx: &Context, key: &str) -> Result<String>;
    fn del(&self, ctx: &Context, key: &str) -> Result<()>;
}

impl KeyValueStore for Storage {
    fn put(&self, ctx: &Context, kv: Kv) -> Result<()> {
        Storage::put(self, ctx, kv)
    }

    fn get(&self, ctx: &Context, key: &str) -> Result<String> {
        Storage::get(self, ctx, key)
    }

    fn del(&self, ctx: &Context, key: &str) -> Result<()> {
        Storage::del(self, ctx, key)
    }
}

/// Volatile store: the bare engine, nothing is logged
impl KeyValueStore for Engine {
    fn put(&self, ctx: &Context, kv: Kv) -> Result<()> {
        self.upsert(ctx, kv)
    }

    fn get(&self, ctx: &Context, key: &str) -> Result<String> {
        Engine::get(self, ctx, key)
    }

    fn del(&self, ctx: &Context, key: &str) -> Result<()> {
        Engine::del(self, ctx, key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn put(&self, ctx: &Context, kv: Kv) -> Result<()> {
        (**self).put(ctx, kv)
    }

    fn get(&self, ctx: &Context, key: &str) -> Result<String> {
        (**self).get(ctx, key)
    }

    fn del(&self, ctx: &Context, key: &str) -> Result<()> {
        (**self).del(ctx, key)
    }
}

/// Command handler: parse, execute, render
pub struct App<S> {
    processor: Processor,
    store: S,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: S) -> Self {
        Self {
            processor: Processor::new(),
            store,
        }
    }

    /// Parse and execute one request line
    ///
    /// Returns `SET ok`, `DEL ok`, or the value for GET.
    pub fn execute(&self, ctx: &Context, raw: &str) -> Result<String> {
        let command = self
            .processor
            .parse_query(raw)
            .map_err(|e| EmberError::query("parse query", e))?;

        let action = command.action;
        let result = match action {
            ActionType::Set => self.store.put(ctx, command.kv).map(|_| "SET ok".to_string()),
            ActionType::Get => self.store.get(ctx, &command.kv.key),
            ActionType::Del => self.store.del(ctx, &command.kv.key).map(|_| "DEL ok".to_string()),
        };

        result.map_err(|e| EmberError::query(format!("{} query", action), e))
    }

    /// Execute a request line and render the response text
    ///
    /// Errors are rendered as their message; there is always a response.
    pub fn handle(&self, ctx: &Context, raw: &str) -> String {
        tracing::trace!("handling command: {}", raw);

        match self.execute(ctx, raw) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!("command failed: {}", e);
                e.to_string()
            }
        }
    }
}
