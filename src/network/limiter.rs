//! Connection limiter
//!
//! A counting semaphore: at most `max` permits are outstanding, and
//! `acquire` blocks until one is released. Permits release on drop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

struct Inner {
    max: usize,
    in_use: Mutex<usize>,
    released: Condvar,
}

/// Caps the number of concurrently handled connections
#[derive(Clone)]
pub struct Limiter {
    inner: Arc<Inner>,
}

/// One unit of capacity; returned to the limiter when dropped
pub struct Permit {
    inner: Arc<Inner>,
}

impl Limiter {
    pub fn new(max: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                max,
                in_use: Mutex::new(0),
                released: Condvar::new(),
            }),
        }
    }

    /// Block until a permit is available
    pub fn acquire(&self) -> Permit {
        let mut in_use = self.inner.in_use.lock();
        while *in_use >= self.inner.max {
            self.inner.released.wait(&mut in_use);
        }
        *in_use += 1;
        self.permit()
    }

    /// Block for at most `timeout`; `None` if no permit freed up
    pub fn acquire_timeout(&self, timeout: Duration) -> Option<Permit> {
        let deadline = Instant::now() + timeout;
        let mut in_use = self.inner.in_use.lock();
        while *in_use >= self.inner.max {
            if self
                .inner
                .released
                .wait_until(&mut in_use, deadline)
                .timed_out()
            {
                if *in_use >= self.inner.max {
                    return None;
                }
                break;
            }
        }
        *in_use += 1;
        Some(self.permit())
    }

    /// Take a permit only if one is free right now
    pub fn try_acquire(&self) -> Option<Permit> {
        let mut in_use = self.inner.in_use.lock();
        if *in_use >= self.inner.max {
            return None;
        }
        *in_use += 1;
        Some(self.permit())
    }

    /// Permits currently held
    pub fn in_use(&self) -> usize {
        *self.inner.in_use.lock()
    }

    pub fn max(&self) -> usize {
        self.inner.max
    }

    fn permit(&self) -> Permit {
        Permit {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        let mut in_use = self.inner.in_use.lock();
        *in_use -= 1;
        self.inner.released.notify_one();
    }
}
