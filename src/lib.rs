//! # EmberKV
//!
//! A single-node key-value store with:
//! - A segmented Write-Ahead Log (WAL) for durability
//! - Batched, group-committed flushing on a background worker
//! - Crash recovery by replaying the WAL on startup
//! - A line-oriented TCP protocol: `SET key value`, `GET key`, `DEL key`
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (thread per connection, limited)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 App (parse + execute)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Storage                                 │
//! │   put/del ──► pending queue ──► flush worker ──► WAL         │
//! │      ▲                               │                       │
//! │      └──────── promise resolved ◄────┘                       │
//! └──────┬──────────────────────────────────────────────────────┘
//!        │ apply after durable / get
//!        ▼
//!   ┌─────────────┐
//!   │   Engine    │
//!   │  (RwLock)   │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod sync;

pub mod engine;
pub mod wal;
pub mod storage;
pub mod protocol;
pub mod app;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use app::{App, KeyValueStore};
pub use config::Config;
pub use engine::{ActionType, Engine, Kv};
pub use error::{EmberError, Result};
pub use storage::Storage;
pub use sync::Context;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of EmberKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
