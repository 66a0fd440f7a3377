//! Caller context
//!
//! A [`Context`] carries a cancellation signal and an optional deadline.
//! Operations check it before doing work, and blocking waits select on it
//! so a caller can stop waiting without affecting work already queued.

use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::error::{EmberError, Result};

/// Cancellation and deadline carried by every storage call
#[derive(Debug, Clone)]
pub struct Context {
    /// Disconnects when the owning [`CancelHandle`] is cancelled or dropped
    done: Receiver<()>,
    deadline: Option<Instant>,
}

/// Cancels the paired [`Context`] (and all its clones).
///
/// Dropping the handle cancels as well.
#[derive(Debug)]
pub struct CancelHandle {
    _tx: Sender<()>,
}

impl CancelHandle {
    pub fn cancel(self) {}
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self {
            done: channel::never(),
            deadline: None,
        }
    }

    /// A fresh context plus the handle that cancels it
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = channel::bounded(0);
        let ctx = Self {
            done: rx,
            deadline: None,
        };
        (ctx, CancelHandle { _tx: tx })
    }

    /// A background context that expires after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_after(timeout)
    }

    /// Derive a context whose deadline is at most `timeout` from now
    pub fn deadline_after(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(current) if current < candidate => current,
            _ => candidate,
        };
        Self {
            done: self.done.clone(),
            deadline: Some(deadline),
        }
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Channel that becomes ready (disconnected) on cancellation
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }

    /// `Ok(())` while the context is live, otherwise the reason it ended
    pub fn err(&self) -> Result<()> {
        if let Err(TryRecvError::Disconnected) = self.done.try_recv() {
            return Err(EmberError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(EmberError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_err()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
