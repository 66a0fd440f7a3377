//! Network Module
//!
//! TCP server, connection handling and client.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per connection, capped by a [`Limiter`]
//! - Requests routed through [`App`](crate::app::App)

mod client;
mod connection;
mod limiter;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use limiter::{Limiter, Permit};
pub use server::{Server, ShutdownHandle};
