//! Configuration for EmberKV
//!
//! Centralized configuration with sensible defaults. A YAML file may
//! override any subset of the fields; missing fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EmberError, Result};

/// Default TCP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3002";

/// Default cap on concurrently handled connections
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;

/// Default maximum segment size (10 MB)
pub const DEFAULT_MAX_SEGMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Default number of entries that triggers a flush
pub const DEFAULT_FLUSH_BATCH_SIZE: usize = 1000;

/// Default flush interval for partial batches
pub const DEFAULT_FLUSH_BATCH_TIMEOUT_MS: u64 = 10;

/// Default capacity of the pending-write queue
pub const DEFAULT_PENDING_QUEUE_CAPACITY: usize = 32 * 1024;

/// Main configuration for an EmberKV instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Logging Configuration
    // -------------------------------------------------------------------------
    pub log: LogConfig,

    // -------------------------------------------------------------------------
    // WAL Configuration
    // -------------------------------------------------------------------------
    pub wal: WalConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,

    /// Human-oriented colored output instead of JSON lines
    pub dev_mode: bool,
}

/// Write-ahead log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalConfig {
    /// Without a WAL, writes go straight to memory and nothing survives a restart
    pub enabled: bool,

    /// Directory holding the segment files
    pub dir: PathBuf,

    /// Segment size (bytes) after which the log rotates
    pub max_segment_size: u64,

    /// Number of pending writes that triggers an immediate flush
    pub flush_batch_size: usize,

    /// Interval (milliseconds) after which a partial batch is flushed
    pub flush_batch_timeout_ms: u64,

    /// Writes that may wait for the flush worker before new ones are refused
    pub pending_queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
            log: LogConfig::default(),
            wal: WalConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dev_mode: false,
        }
    }
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("./db/wal"),
            max_segment_size: DEFAULT_MAX_SEGMENT_SIZE,
            flush_batch_size: DEFAULT_FLUSH_BATCH_SIZE,
            flush_batch_timeout_ms: DEFAULT_FLUSH_BATCH_TIMEOUT_MS,
            pending_queue_capacity: DEFAULT_PENDING_QUEUE_CAPACITY,
        }
    }
}

impl WalConfig {
    /// Flush interval as a `Duration`
    pub fn flush_batch_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_batch_timeout_ms)
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load configuration from a YAML file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EmberError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text and validate it
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| EmberError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the storage layer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(EmberError::Config("max_connections must be > 0".into()));
        }
        if self.wal.max_segment_size == 0 {
            return Err(EmberError::Config("wal.max_segment_size must be > 0".into()));
        }
        if self.wal.flush_batch_size == 0 {
            return Err(EmberError::Config("wal.flush_batch_size must be > 0".into()));
        }
        if self.wal.flush_batch_timeout_ms == 0 {
            return Err(EmberError::Config(
                "wal.flush_batch_timeout_ms must be > 0".into(),
            ));
        }
        if self.wal.pending_queue_capacity == 0 {
            return Err(EmberError::Config(
                "wal.pending_queue_capacity must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the default log filter
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log.level = level.into();
        self
    }

    /// Switch between development and production log output
    pub fn log_dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.log.dev_mode = dev_mode;
        self
    }

    /// Enable or disable the write-ahead log
    pub fn wal_enabled(mut self, enabled: bool) -> Self {
        self.config.wal.enabled = enabled;
        self
    }

    /// Set the WAL directory
    pub fn wal_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wal.dir = path.into();
        self
    }

    /// Set the maximum segment size (in bytes)
    pub fn max_segment_size(mut self, size: u64) -> Self {
        self.config.wal.max_segment_size = size;
        self
    }

    /// Set the flush batch size (in entries)
    pub fn flush_batch_size(mut self, size: usize) -> Self {
        self.config.wal.flush_batch_size = size;
        self
    }

    /// Set the flush batch timeout
    pub fn flush_batch_timeout(mut self, timeout: Duration) -> Self {
        self.config.wal.flush_batch_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the pending-write queue capacity
    pub fn pending_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.wal.pending_queue_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
