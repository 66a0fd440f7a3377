//! Synchronization primitives
//!
//! - [`Context`]: caller-side cancellation and deadlines
//! - [`Promise`] / [`Future`]: single-assignment completion cell used to
//!   hand a batch outcome from the flush worker back to a blocked writer

mod context;
mod promise;

pub use context::{CancelHandle, Context};
pub use promise::{promise, Future, Promise};
