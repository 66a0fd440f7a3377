//! Connection Handler
//!
//! Handles individual client connections: one request line in, one
//! response line out.

use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::app::{App, KeyValueStore};
use crate::error::Result;
use crate::sync::Context;

/// One client session on its own thread
pub struct Connection<S> {
    /// Request lines are read from here
    reader: BufReader<TcpStream>,

    /// Response lines go out here, flushed per response
    writer: BufWriter<TcpStream>,

    /// Command handler shared by all connections
    app: Arc<App<S>>,

    peer_addr: String,
}

impl<S: KeyValueStore> Connection<S> {
    /// Wrap an accepted stream
    pub fn new(stream: TcpStream, app: Arc<App<S>>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            app,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a timeout disabled)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Serve requests until the client disconnects
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!(peer = %self.peer_addr, "session started");

        let ctx = Context::background();
        let mut line = Vec::new();

        loop {
            line.clear();
            match self.reader.read_until(b'\n', &mut line) {
                Ok(0) => {
                    tracing::debug!(peer = %self.peer_addr, "session closed by client");
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) if is_disconnect(e.kind()) => {
                    tracing::debug!(peer = %self.peer_addr, "session dropped: {}", e);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(peer = %self.peer_addr, "read failed: {}", e);
                    return Err(e.into());
                }
            }

            let text = String::from_utf8_lossy(&line);
            let request = text.trim_end_matches(&['\r', '\n'][..]);
            if request.is_empty() {
                continue;
            }

            let response = self.app.handle(&ctx, request);
            tracing::trace!(peer = %self.peer_addr, request, response = %response, "served");

            if let Err(e) = self.send_response(&response) {
                if is_disconnect(e.kind()) {
                    tracing::debug!(peer = %self.peer_addr, "gone before response: {}", e);
                    return Ok(());
                }
                tracing::warn!(peer = %self.peer_addr, "write failed: {}", e);
                return Err(e.into());
            }
        }
    }

    fn send_response(&mut self, response: &str) -> std::io::Result<()> {
        self.writer.write_all(response.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
