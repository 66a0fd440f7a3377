//! Storage Module
//!
//! Orchestrates the engine and the WAL.
//!
//! ## Responsibilities
//! - Funnel writes through a bounded pending queue
//! - Batch queued writes on a single flush worker (size or timeout)
//! - Apply each synced batch to the engine in log order
//! - Replay the WAL into the engine on startup

mod manager;
mod worker;

pub use manager::Storage;
