//! Promise / Future pair
//!
//! A one-shot completion cell. [`Promise::set`] consumes the promise, so a
//! value can be assigned at most once; the paired [`Future`] blocks until
//! the value arrives or the waiter's [`Context`] ends.

use crossbeam::channel::{self, select, Receiver, Sender};

use super::Context;
use crate::error::{EmberError, Result};

/// Write side of a one-shot completion cell
#[derive(Debug)]
pub struct Promise<T> {
    tx: Sender<T>,
}

/// Read side of a one-shot completion cell
#[derive(Debug)]
pub struct Future<T> {
    rx: Receiver<T>,
}

/// Create a linked promise/future pair
pub fn promise<T>() -> (Promise<T>, Future<T>) {
    let (tx, rx) = channel::bounded(1);
    (Promise { tx }, Future { rx })
}

impl<T> Promise<T> {
    /// Resolve the promise.
    ///
    /// The future may already have been dropped by a waiter that gave up;
    /// the value is discarded in that case.
    pub fn set(self, value: T) {
        let _ = self.tx.send(value);
    }
}

impl<T> Future<T> {
    /// Block until the promise is resolved.
    ///
    /// Returns `Cancelled` / `DeadlineExceeded` if `ctx` ends first, and
    /// `PromiseDropped` if the promise is dropped without being set.
    pub fn wait(self, ctx: &Context) -> Result<T> {
        let deadline = match ctx.deadline() {
            Some(at) => channel::at(at),
            None => channel::never(),
        };

        select! {
            recv(self.rx) -> value => value.map_err(|_| EmberError::PromiseDropped),
            recv(ctx.done()) -> _ => Err(EmberError::Cancelled),
            recv(deadline) -> _ => Err(EmberError::DeadlineExceeded),
        }
    }

    /// Non-blocking check; `None` while unresolved
    pub fn try_get(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}
