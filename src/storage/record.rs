//! Record codec
//!
//! Translates between a (key, value) pair and its on-disk bytes.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{DriftError, Result};

use super::{FREED, HEADER_SIZE, LIVE};

/// Decoded fixed-size record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Byte count of the key that follows the header
    pub key_len: u32,
    /// Byte count of the value that follows the key
    pub value_len: u32,
    /// 0 = live, nonzero = tombstone
    pub freed: u8,
}

impl RecordHeader {
    /// Header for a fresh live record
    pub fn live(key_len: u32, value_len: u32) -> Self {
        Self {
            key_len,
            value_len,
            freed: LIVE,
        }
    }

    /// Header for a freed filler record covering `total` bytes.
    ///
    /// `total` includes the header itself, so it must be at least `HEADER_SIZE`.
    pub(crate) fn padding(total: u64) -> Self {
        debug_assert!(total >= HEADER_SIZE as u64);
        Self {
            key_len: 0,
            value_len: (total - HEADER_SIZE as u64) as u32,
            freed: FREED,
        }
    }

    /// Decode a header. Pure, no I/O.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut buf = &bytes[..];
        let key_len = buf.get_u32();
        let value_len = buf.get_u32();
        let freed = buf.get_u8();
        Self {
            key_len,
            value_len,
            freed,
        }
    }

    /// Encode this header to its 9 on-disk bytes
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut buf = &mut out[..];
        buf.put_u32(self.key_len);
        buf.put_u32(self.value_len);
        buf.put_u8(self.freed);
        out
    }

    pub fn is_live(&self) -> bool {
        self.freed == LIVE
    }

    /// Total on-disk size: header + key + value
    pub fn record_len(&self) -> u64 {
        HEADER_SIZE as u64 + self.key_len as u64 + self.value_len as u64
    }

    /// Absolute offset of the key, given the record's starting offset
    pub fn key_offset(&self, record_offset: u64) -> u64 {
        record_offset + HEADER_SIZE as u64
    }

    /// Absolute offset of the value, given the record's starting offset
    pub fn value_offset(&self, record_offset: u64) -> u64 {
        self.key_offset(record_offset) + self.key_len as u64
    }
}

/// Convert a field length to its 4-byte representation
pub(crate) fn field_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| DriftError::RecordTooLarge { len })
}

/// Encode a live record: `key_len ‖ value_len ‖ 0 ‖ key ‖ value`
///
/// Fails with `RecordTooLarge` if either field exceeds `u32::MAX` bytes.
///
/// # Panics
/// If the encoded buffer is not exactly `9 + key.len() + value.len()` bytes.
/// That can only happen through a bug in this function, and writing such a
/// buffer would corrupt every record after it.
pub fn encode_record(key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    let header = RecordHeader::live(field_len(key.len())?, field_len(value.len())?);

    let expected_len = HEADER_SIZE + key.len() + value.len();
    let mut buf = BytesMut::with_capacity(expected_len);
    buf.put_slice(&header.encode());
    buf.put_slice(key);
    buf.put_slice(value);

    assert_eq!(
        buf.len(),
        expected_len,
        "encoded record has wrong length: expected {} bytes, got {}",
        expected_len,
        buf.len()
    );

    Ok(buf.to_vec())
}
