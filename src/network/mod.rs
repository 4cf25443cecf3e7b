//! Network Module
//!
//! TCP front-end for a single store.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking listener, polls a shutdown flag)
//! - Fixed pool of worker threads fed through a bounded channel
//! - Every command goes through one `Mutex<Store>`, the single-writer guard
//!   the store requires

mod client;
mod connection;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use server::{Server, ShutdownHandle};
