//! Storage
//!
//! Puts the WAL in front of the engine.
//!
//! ## Write path
//! 1. Enqueue `{entry, promise}` without blocking (full queue fails fast)
//! 2. The flush worker writes and syncs the batch, applies its entries to
//!    the engine in log order, then resolves every promise in the batch
//! 3. The caller waits on its future until then, or until its own context
//!    ends; giving up does not stop the queued write
//!
//! A write is therefore visible in memory only after it is durable, and
//! the engine always holds what a replay of the log would produce.
//! Reads go straight to the engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{self, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};

use crate::config::{Config, WalConfig};
use crate::engine::{Engine, Kv};
use crate::error::{EmberError, Result};
use crate::sync::{promise, Context};
use crate::wal::{LogEntry, Wal};

use super::worker::{apply_entry, FlushWorker, PendingOperation};

/// Durable key-value storage
///
/// ## Concurrency
/// - Callers run on any thread; `put`/`del` block only on their own future
/// - `pending` is the single hand-off point to the flush worker; the
///   read side of its lock is held just long enough to `try_send`
/// - `close` takes the write side, so no send can race with closing
/// - With a WAL, only the flush worker mutates the engine
pub struct Storage {
    engine: Arc<Engine>,

    /// Sender side of the pending queue; `None` once closed or without a WAL
    pending: RwLock<Option<Sender<PendingOperation>>>,

    /// Capacity the pending queue was created with
    queue_capacity: usize,

    /// Flush worker thread, joined on close
    worker: Mutex<Option<JoinHandle<()>>>,

    wal_enabled: bool,
    closed: AtomicBool,
}

impl Storage {
    /// Open storage from configuration
    ///
    /// Opens the WAL when `config.wal.enabled` and replays it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let wal = if config.wal.enabled {
            Some(Wal::open(&config.wal)?)
        } else {
            None
        };
        Self::open(Engine::new(), wal, &config.wal)
    }

    /// Build storage around an engine and an optional WAL
    ///
    /// With a WAL, the engine is cleared and rebuilt from the log before
    /// this returns; any recovery error is returned and nothing is started.
    pub fn open(engine: Engine, wal: Option<Wal>, options: &WalConfig) -> Result<Self> {
        let engine = Arc::new(engine);

        let Some(wal) = wal else {
            tracing::info!("storage opened without WAL; writes are not durable");
            return Ok(Self {
                engine,
                pending: RwLock::new(None),
                queue_capacity: 0,
                worker: Mutex::new(None),
                wal_enabled: false,
                closed: AtomicBool::new(false),
            });
        };

        let replayed = recover(&engine, &wal)?;
        tracing::info!(
            entries = replayed,
            keys = engine.len(),
            "WAL replay complete"
        );

        let capacity = options.pending_queue_capacity.max(1);
        let (tx, rx) = channel::bounded(capacity);
        let worker = FlushWorker {
            wal,
            engine: Arc::clone(&engine),
            rx,
            batch_size: options.flush_batch_size.max(1),
            batch_timeout: options.flush_batch_timeout(),
        }
        .spawn()?;

        Ok(Self::with_queue(engine, tx, capacity, Some(worker)))
    }

    /// Storage whose writes go to `tx`, drained by `worker`
    fn with_queue(
        engine: Arc<Engine>,
        tx: Sender<PendingOperation>,
        queue_capacity: usize,
        worker: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            engine,
            pending: RwLock::new(Some(tx)),
            queue_capacity,
            worker: Mutex::new(worker),
            wal_enabled: true,
            closed: AtomicBool::new(false),
        }
    }

    /// Store a key-value pair; returns once it is durable and visible
    pub fn put(&self, ctx: &Context, kv: Kv) -> Result<()> {
        self.ensure_open()?;
        if !self.wal_enabled {
            return self.engine.upsert(ctx, kv);
        }
        self.pending_write(ctx, LogEntry::set(kv.key, kv.value))
    }

    /// Get a value; never touches the WAL
    pub fn get(&self, ctx: &Context, key: &str) -> Result<String> {
        self.engine.get(ctx, key)
    }

    /// Delete a key; returns once the deletion is durable and visible
    pub fn del(&self, ctx: &Context, key: &str) -> Result<()> {
        self.ensure_open()?;
        if !self.wal_enabled {
            return self.engine.del(ctx, key);
        }
        self.pending_write(ctx, LogEntry::del(key))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(EmberError::StorageClosed);
        }
        Ok(())
    }

    /// Queue an entry and wait until its batch is flushed and applied
    fn pending_write(&self, ctx: &Context, entry: LogEntry) -> Result<()> {
        ctx.err()?;

        let (promise, future) = promise();
        {
            let pending = self.pending.read();
            let Some(tx) = pending.as_ref() else {
                return Err(EmberError::StorageClosed);
            };

            match tx.try_send(PendingOperation { entry, promise }) {
                Ok(()) => {}
                Err(TrySendError::Full(op)) => {
                    tracing::warn!(capacity = self.queue_capacity, "pending queue saturated");
                    op.promise.set(Err(EmberError::QueueSaturated {
                        capacity: self.queue_capacity,
                    }));
                }
                Err(TrySendError::Disconnected(op)) => {
                    op.promise.set(Err(EmberError::StorageClosed));
                }
            }
        }

        future.wait(ctx)?
    }

    /// Stop accepting writes, flush what is queued and stop the worker
    ///
    /// Writes issued after this starts fail with `StorageClosed`. Writes
    /// already queued are flushed and applied before `close` returns.
    /// Idempotent.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        // Dropping the only sender closes the queue; the worker drains it.
        drop(self.pending.write().take());

        if let Some(handle) = self.worker.lock().take() {
            handle
                .join()
                .map_err(|_| EmberError::Storage("flush worker panicked".to_string()))?;
        }

        tracing::info!("storage closed");
        Ok(())
    }

    /// The in-memory engine
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn wal_enabled(&self) -> bool {
        self.wal_enabled
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("error closing storage: {}", e);
        }
    }
}

/// Rebuild the engine from the WAL; returns the number of entries replayed
fn recover(engine: &Engine, wal: &Wal) -> Result<usize> {
    let ctx = Context::background();

    engine.flush();
    let entries = wal.read_segments()?;
    let count = entries.len();

    for entry in entries {
        apply_entry(engine, &ctx, entry)?;
    }

    Ok(count)
}
