//! TCP Server
//!
//! Accepts connections and hands each one to its own thread, keeping at
//! most `max_connections` in flight.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::app::{App, KeyValueStore};
use crate::config::Config;
use crate::error::{EmberError, Result};

use super::{Connection, Limiter, Permit};

/// How often the accept loop re-checks the shutdown flag
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for EmberKV
pub struct Server<S> {
    config: Config,
    app: Arc<App<S>>,
    listener: TcpListener,
    limiter: Limiter,
    shutdown: Arc<AtomicBool>,
}

/// Stops a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl<S: KeyValueStore + 'static> Server<S> {
    /// Bind the listener on `config.listen_addr`
    pub fn bind(config: Config, app: Arc<App<S>>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            EmberError::Network(format!("cannot bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        let limiter = Limiter::new(config.max_connections);

        Ok(Self {
            config,
            app,
            listener,
            limiter,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Accept connections until shut down (blocking)
    pub fn run(&self) -> Result<()> {
        tracing::info!(
            max_connections = self.limiter.max(),
            "Listening on {}",
            self.local_addr()?
        );

        while !self.is_shutdown() {
            let Some(permit) = self.limiter.acquire_timeout(POLL_INTERVAL) else {
                continue;
            };

            let (stream, addr) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    drop(permit);
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("accept failed: {}", e);
                    continue;
                }
            };

            if let Err(e) = self.spawn_handler(stream, permit) {
                tracing::warn!("cannot serve {}: {}", addr, e);
            }
        }

        tracing::info!("Server stopped accepting connections");
        Ok(())
    }

    fn spawn_handler(&self, stream: TcpStream, permit: Permit) -> Result<()> {
        stream.set_nonblocking(false)?;

        let mut connection = Connection::new(stream, Arc::clone(&self.app))?;
        connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;

        thread::Builder::new()
            .name("emberkv-conn".to_string())
            .spawn(move || {
                let _permit = permit;
                if let Err(e) = connection.handle() {
                    tracing::debug!("connection {} ended: {}", connection.peer_addr(), e);
                }
            })?;

        Ok(())
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}
