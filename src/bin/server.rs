//! EmberKV Server Binary
//!
//! Opens the storage (replaying the WAL) and starts the TCP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use emberkv::network::Server;
use emberkv::config::LogConfig;
use emberkv::{App, Config, Storage};
use tracing_subscriber::{fmt, EnvFilter};

/// EmberKV Server
#[derive(Parser, Debug)]
#[command(name = "emberkv-server")]
#[command(about = "Single-node key-value store with a write-ahead log")]
#[command(version)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (host:port), overrides the config file
    #[arg(short, long)]
    listen: Option<String>,

    /// WAL directory, overrides the config file
    #[arg(short, long)]
    wal_dir: Option<PathBuf>,

    /// Maximum concurrent connections, overrides the config file
    #[arg(short, long)]
    max_connections: Option<usize>,
}

fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(dir) = args.wal_dir {
        config.wal.dir = dir;
    }
    if let Some(max) = args.max_connections {
        config.max_connections = max;
    }

    init_logging(&config.log);

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("EmberKV Server v{}", emberkv::VERSION);
    tracing::info!("WAL directory: {}", config.wal.dir.display());
    tracing::info!("Listen address: {}", config.listen_addr);

    // Open storage; recovery must finish before any client is served
    let storage = match Storage::from_config(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open storage: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        wal_enabled = storage.wal_enabled(),
        "Storage initialized with {} keys",
        storage.engine().len()
    );

    let app = Arc::new(App::new(Arc::clone(&storage)));

    let server = match Server::bind(config, app) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };

    // Ctrl+C stops the accept loop; storage is then closed and drained
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.shutdown();
    }) {
        tracing::warn!("Cannot install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
    }

    if let Err(e) = storage.close() {
        tracing::error!("Failed to close storage: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level; an empty or invalid level
/// falls back to `debug`. Dev mode prints colored human-readable lines,
/// otherwise one JSON object per event.
fn init_logging(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if log.level.trim().is_empty() {
                EnvFilter::try_new("debug")
            } else {
                EnvFilter::try_new(&log.level)
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    if log.dev_mode {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    }
}
