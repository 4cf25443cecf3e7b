//! # DriftKV
//!
//! An embedded key-value store backed by a single append-only log file:
//! - One file, a sequence of length-prefixed records, no index
//! - Lookups walk the log from offset 0; the first live record wins
//! - Updates rewrite in place when the value fits, otherwise tombstone and append
//! - Optional TCP front-end serving GET/PUT/PING
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               TCP Server (optional front-end)               │
//! │                 Mutex<Store>, worker threads                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store                                │
//! │              open / put / get / close                       │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐            ┌─────────────────┐
//!   │ Linear Scanner  │───────────▶│  Record Codec   │
//!   │     (find)      │            │ (9-byte header) │
//!   └─────────────────┘            └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use driftkv::Store;
//!
//! let mut store = Store::open_path("data.log")?;
//! store.put(b"hello", b"world")?;
//! assert_eq!(store.get(b"hello")?, b"world");
//! store.close()?;
//! # Ok::<(), driftkv::DriftError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod store;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DriftError, Result};
pub use config::{Config, SyncStrategy};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of DriftKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
