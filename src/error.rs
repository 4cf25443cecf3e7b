//! Error types for DriftKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DriftError
pub type Result<T> = std::result::Result<T, DriftError>;

/// Unified error type for DriftKV operations
#[derive(Debug, Error)]
pub enum DriftError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    /// The log cannot be walked past `offset`
    #[error("Log corruption at offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// A key or value does not fit a 4-byte length field
    #[error("Record field too large: {len} bytes (max {})", u32::MAX)]
    RecordTooLarge { len: usize },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DriftError {
    pub(crate) fn corruption(offset: u64, reason: impl Into<String>) -> Self {
        DriftError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// True for the NotFound condition, so callers can branch without matching
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriftError::KeyNotFound)
    }
}
