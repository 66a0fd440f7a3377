//! Flush worker
//!
//! One background thread per `Storage`. It collects pending writes into a
//! batch and writes the batch to the WAL when it reaches the size threshold
//! or when the flush timer ticks, whichever comes first. A written batch is
//! applied to the engine in log order before its promises resolve, so the
//! engine always matches what a replay of the log would rebuild. Every
//! promise in a batch is resolved with the same outcome.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, select, Receiver};

use crate::engine::{ActionType, Engine, Kv};
use crate::error::{EmberError, Result};
use crate::sync::{Context, Promise};
use crate::wal::{LogEntry, Wal};

/// Floor for the flush tick so a zero timeout cannot spin
const MIN_BATCH_TIMEOUT: Duration = Duration::from_millis(1);

/// A write waiting for its batch to be flushed
pub(crate) struct PendingOperation {
    pub entry: LogEntry,
    pub promise: Promise<Result<()>>,
}

/// Entries collected since the last flush, with their promises
struct Batch {
    entries: Vec<LogEntry>,
    promises: Vec<Promise<Result<()>>>,
}

impl Batch {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            promises: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, op: PendingOperation) {
        self.entries.push(op.entry);
        self.promises.push(op.promise);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Owns the WAL on the flush thread
pub(crate) struct FlushWorker {
    pub wal: Wal,
    pub engine: Arc<Engine>,
    pub rx: Receiver<PendingOperation>,
    pub batch_size: usize,
    pub batch_timeout: Duration,
}

impl FlushWorker {
    /// Start the worker on a dedicated thread
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("emberkv-wal-flusher".to_string())
            .spawn(move || self.run())
    }

    /// Batch until size or timeout, flush, repeat; drain once the queue closes
    fn run(self) {
        let FlushWorker {
            mut wal,
            engine,
            rx,
            batch_size,
            batch_timeout,
        } = self;

        let ticker = channel::tick(batch_timeout.max(MIN_BATCH_TIMEOUT));
        let mut batch = Batch::with_capacity(batch_size);

        loop {
            let open = select! {
                recv(rx) -> msg => match msg {
                    Ok(op) => {
                        batch.push(op);
                        if batch.len() >= batch_size {
                            batch = flush(&mut wal, &engine, batch, batch_size);
                        }
                        true
                    }
                    Err(_) => false,
                },
                recv(ticker) -> _ => {
                    batch = flush(&mut wal, &engine, batch, batch_size);
                    true
                }
            };

            if !open {
                break;
            }
        }

        // Queue closed: everything still buffered is in `batch`
        flush(&mut wal, &engine, batch, 0);

        if let Err(e) = wal.close() {
            tracing::warn!("WAL close failed: {}", e);
        }
        tracing::debug!("flush worker stopped");
    }
}

/// Write `batch` to the WAL, apply it, and resolve its promises; returns a
/// fresh batch
fn flush(wal: &mut Wal, engine: &Engine, batch: Batch, next_capacity: usize) -> Batch {
    if batch.len() == 0 {
        return batch;
    }

    let Batch { entries, promises } = batch;

    match wal.write(&entries) {
        Ok(()) => {
            let ctx = Context::background();
            for entry in entries {
                if let Err(e) = apply_entry(engine, &ctx, entry) {
                    tracing::error!("cannot apply flushed entry: {}", e);
                }
            }
            for promise in promises {
                promise.set(Ok(()));
            }
        }
        Err(e) => {
            tracing::warn!(entries = entries.len(), "WAL flush failed: {}", e);
            let cause = Arc::new(e);
            for promise in promises {
                promise.set(Err(EmberError::WalFlush(Arc::clone(&cause))));
            }
        }
    }

    Batch::with_capacity(next_capacity)
}

/// Apply one logged mutation to the engine
///
/// Shared by replay and the flush worker. `Get` entries are never logged
/// and are skipped.
pub(crate) fn apply_entry(engine: &Engine, ctx: &Context, entry: LogEntry) -> Result<()> {
    match entry.action {
        ActionType::Set => engine.upsert(ctx, Kv::new(entry.key, entry.value)),
        ActionType::Del => engine.del(ctx, &entry.key),
        ActionType::Get => Ok(()),
    }
}
