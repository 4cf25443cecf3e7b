//! Storage Module
//!
//! The on-disk log: one file, a sequence of records from offset 0, no index.
//!
//! ## Responsibilities
//! - Encode and decode records (fixed 9-byte header + key + value)
//! - Locate the live record for a key by walking headers from offset 0
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Record 1                                                   │
//! │ ┌──────────┬──────────┬───────────┬──────────┬───────────┐ │
//! │ │KeyLen (4)│ValLen (4)│ Freed (1) │   Key    │   Value   │ │
//! │ └──────────┴──────────┴───────────┴──────────┴───────────┘ │
//! ├────────────────────────────────────────────────────────────┤
//! │ Record 2                                                   │
//! │ ...                                                        │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are big-endian u32. `Freed == 0` marks a live record; anything
//! else is a tombstone the scanner skips. There is no file header, footer,
//! checksum or version tag.

mod record;
mod scanner;

pub use record::{encode_record, RecordHeader};
pub(crate) use record::field_len;
pub use scanner::{find, RecordLocation};

// =============================================================================
// Shared Constants (used by record, scanner, store)
// =============================================================================

/// Header size: KeyLen (4) + ValLen (4) + Freed (1) = 9 bytes
pub const HEADER_SIZE: usize = 9;

/// Offset of the value-length field within a record
pub const VALUE_LEN_OFFSET: u64 = 4;

/// Offset of the freed byte within a record
pub const FREED_OFFSET: u64 = 8;

/// Freed byte of a live record
pub const LIVE: u8 = 0;

/// Freed byte written when a record is superseded or used as padding
pub const FREED: u8 = 1;
