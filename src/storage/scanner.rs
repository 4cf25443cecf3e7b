//! Linear scanner
//!
//! Walks the log from offset 0, decoding headers, to find the live record for
//! a key. There is no index and nothing is cached between calls, so every
//! lookup costs O(records before the match).

use std::io::{Read, Seek, SeekFrom};

use crate::error::{DriftError, Result};

use super::{RecordHeader, HEADER_SIZE};

/// Where a live record starts, plus its decoded header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocation {
    /// Byte offset of the record's header
    pub offset: u64,
    /// Header as read during the scan
    pub header: RecordHeader,
}

impl RecordLocation {
    /// Absolute offset of the value bytes
    pub fn value_offset(&self) -> u64 {
        self.header.value_offset(self.offset)
    }
}

/// Find the first live record for `key` in `file[0..end)`.
///
/// Returns:
/// - `Ok(Some(location))` — first live record with this key, in file order
/// - `Ok(None)` — scanned to `end` without a match
/// - `Err(Corruption)` — a header or payload runs past `end`
/// - `Err(Io)` — the underlying reader failed
pub fn find<F: Read + Seek>(file: &mut F, key: &[u8], end: u64) -> Result<Option<RecordLocation>> {
    let mut cursor = 0u64;
    let mut header_buf = [0u8; HEADER_SIZE];
    let mut key_buf = Vec::with_capacity(key.len());

    while cursor < end {
        if end - cursor < HEADER_SIZE as u64 {
            tracing::warn!(offset = cursor, end, "partial record header at end of log");
            return Err(DriftError::corruption(
                cursor,
                format!("partial header: {} of {} bytes", end - cursor, HEADER_SIZE),
            ));
        }

        file.seek(SeekFrom::Start(cursor))?;
        file.read_exact(&mut header_buf)?;
        let header = RecordHeader::decode(&header_buf);

        let record_end = cursor + header.record_len();
        if record_end > end {
            tracing::warn!(offset = cursor, record_end, end, "record runs past end of log");
            return Err(DriftError::corruption(
                cursor,
                format!(
                    "record of {} bytes runs past end of log at {}",
                    header.record_len(),
                    end
                ),
            ));
        }

        // A key of a different length cannot match, so skip the read
        if header.is_live() && header.key_len as usize == key.len() {
            key_buf.resize(key.len(), 0);
            file.read_exact(&mut key_buf)?;
            if key_buf == key {
                tracing::trace!(offset = cursor, "found live record");
                return Ok(Some(RecordLocation {
                    offset: cursor,
                    header,
                }));
            }
        }

        cursor = record_end;
    }

    Ok(None)
}
