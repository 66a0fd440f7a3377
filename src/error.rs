//! Error types for EmberKV
//!
//! Provides a unified error type for all operations.

use std::sync::Arc;

use thiserror::Error;

/// Result type alias using EmberError
pub type Result<T> = std::result::Result<T, EmberError>;

/// Unified error type for EmberKV operations
#[derive(Debug, Error)]
pub enum EmberError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("WAL encode error: {0}")]
    Encode(String),

    #[error("WAL decode error: {0}")]
    Decode(String),

    #[error("unknown log tag: {0}")]
    UnknownLogTag(u8),

    /// A batch flush failed; every operation of the batch carries the same cause.
    #[error("WAL flush failed: {0}")]
    WalFlush(Arc<EmberError>),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("no key")]
    KeyNotFound,

    #[error("pending queue is full (capacity {capacity})")]
    QueueSaturated { capacity: usize },

    #[error("storage is closed")]
    StorageClosed,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Protocol(String),

    /// A failed command, labelled with what was being executed
    #[error("{what}: {source}")]
    Query {
        what: String,
        #[source]
        source: Box<EmberError>,
    },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("promise dropped before it was resolved")]
    PromiseDropped,
}

impl EmberError {
    /// True if this error means the key is absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            EmberError::KeyNotFound => true,
            EmberError::Query { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Label an error with the command that produced it
    pub fn query(what: impl Into<String>, source: EmberError) -> Self {
        EmberError::Query {
            what: what.into(),
            source: Box::new(source),
        }
    }

    /// True if the caller's context ended the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EmberError::Cancelled | EmberError::DeadlineExceeded)
    }
}

