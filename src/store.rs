//! Store Module
//!
//! The public storage client: open a log file, put and get values, close it.
//!
//! ## Responsibilities
//! - Own the file handle and the append tail
//! - Decide between in-place rewrite and supersede-then-append on `put`
//! - Read values located by the scanner on `get`

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::{Config, SyncStrategy};
use crate::error::{DriftError, Result};
use crate::protocol::Command;
use crate::storage::{
    encode_record, field_len, find, RecordHeader, RecordLocation, FREED, FREED_OFFSET,
    HEADER_SIZE, VALUE_LEN_OFFSET,
};

/// An open log-backed key-value store
///
/// ## Concurrency Model: Single Writer
///
/// Every operation takes `&mut self`, so the borrow checker guarantees at most
/// one operation in flight per handle. The append offset is tracked in `tail`
/// rather than recomputed by seeking to end-of-file before each append.
/// To share a store across threads, wrap it in a lock
/// (see `network::Server`, which uses `parking_lot::Mutex`).
pub struct Store {
    /// Store configuration
    config: Config,

    /// Read-write handle on the log
    file: File,

    /// Offset one past the last record; the next append lands here
    tail: u64,

    /// Puts since the last fsync
    unsynced_writes: usize,
}

impl Store {
    /// Open or create the log at `config.data_path`
    ///
    /// Existing content is neither replayed nor validated; a malformed log
    /// surfaces as `Corruption` on the first scan that reaches the bad bytes.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&config.data_path)?;
        let tail = file.metadata()?.len();

        tracing::debug!(path = %config.data_path.display(), tail, "opened store");

        Ok(Self {
            config,
            file,
            tail,
            unsynced_writes: 0,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified log file
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().data_path(path.as_ref()).build();
        Self::open(config)
    }

    /// Execute a protocol command
    pub fn execute(&mut self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Get { key } => self.get(&key).map(Some),
            Command::Put { key, value } => {
                self.put(&key, &value)?;
                Ok(None)
            }
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        }
    }

    /// Store `value` under `key`
    ///
    /// With old value length `L` and new length `N`:
    /// - key absent → append a fresh record
    /// - `N == L` → rewrite the value in place
    /// - `L - N >= 9` → rewrite in place and cover the leftover bytes with a
    ///   freed padding record so the log stays walkable
    /// - otherwise → mark the old record freed, then append
    ///
    /// In-place writes go padding header, then value bytes, then the
    /// value-length field. Until the length field changes, the padding and the
    /// new bytes sit inside the old value, so a failure at any step leaves the
    /// log walkable.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        field_len(key.len())?;
        let new_len = field_len(value.len())?;

        match self.locate(key)? {
            Some(location) if location.header.value_len == new_len => {
                self.rewrite_value(&location, value)?;
            }
            Some(location)
                if location
                    .header
                    .value_len
                    .checked_sub(new_len)
                    .is_some_and(|gap| gap >= HEADER_SIZE as u32) =>
            {
                let gap = (location.header.value_len - new_len) as u64;
                self.write_padding(location.value_offset() + new_len as u64, gap)?;
                self.rewrite_value(&location, value)?;
            }
            Some(location) => {
                self.mark_freed(location.offset)?;
                self.append(key, value)?;
            }
            None => self.append(key, value)?,
        }

        self.record_write()
    }

    /// Get the value stored under `key`
    ///
    /// Returns `Err(KeyNotFound)` if no live record exists for the key.
    pub fn get(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        let location = self.locate(key)?.ok_or(DriftError::KeyNotFound)?;

        let mut value = vec![0u8; location.header.value_len as usize];
        self.file.seek(SeekFrom::Start(location.value_offset()))?;
        self.file.read_exact(&mut value)?;

        Ok(value)
    }

    /// Whether a live record exists for `key`
    pub fn contains(&mut self, key: &[u8]) -> Result<bool> {
        Ok(self.locate(key)?.is_some())
    }

    /// Run the scanner for `key` and return the live record's location
    pub fn locate(&mut self, key: &[u8]) -> Result<Option<RecordLocation>> {
        find(&mut self.file, key, self.tail)
    }

    /// Flush written data to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced_writes = 0;
        Ok(())
    }

    /// Close the store, syncing first so write-back errors are reported
    pub fn close(mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        tracing::debug!(path = %self.config.data_path.display(), tail = self.tail, "closed store");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Size of the log in bytes
    pub fn len(&self) -> u64 {
        self.tail
    }

    pub fn is_empty(&self) -> bool {
        self.tail == 0
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.config.data_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(bytes)?;
        Ok(())
    }

    /// Overwrite the value bytes, then the value-length field, of a live record
    fn rewrite_value(&mut self, location: &RecordLocation, value: &[u8]) -> Result<()> {
        let new_len = value.len() as u32;
        self.write_at(location.value_offset(), value)?;
        self.write_at(location.offset + VALUE_LEN_OFFSET, &new_len.to_be_bytes())?;

        tracing::trace!(
            offset = location.offset,
            old_len = location.header.value_len,
            new_len,
            "rewrote value in place"
        );
        Ok(())
    }

    /// Cover `len` stale bytes at `offset` with a freed record
    fn write_padding(&mut self, offset: u64, len: u64) -> Result<()> {
        let header = RecordHeader::padding(len);
        self.write_at(offset, &header.encode())?;
        tracing::trace!(offset, len, "padded stale value bytes");
        Ok(())
    }

    /// Tombstone the record at `offset`
    fn mark_freed(&mut self, offset: u64) -> Result<()> {
        self.write_at(offset + FREED_OFFSET, &[FREED])?;
        tracing::debug!(offset, "superseded record marked freed");
        Ok(())
    }

    /// Append a fresh live record at the tail
    fn append(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let encoded = encode_record(key, value)?;
        let offset = self.tail;
        self.write_at(offset, &encoded)?;
        self.tail += encoded.len() as u64;

        tracing::trace!(offset, len = encoded.len(), "appended record");
        Ok(())
    }

    /// Apply the sync strategy after a successful put
    fn record_write(&mut self) -> Result<()> {
        self.unsynced_writes += 1;
        match self.config.sync_strategy {
            SyncStrategy::EveryWrite => self.sync(),
            SyncStrategy::EveryNWrites { count } if self.unsynced_writes >= count => self.sync(),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.config.data_path)
            .field("tail", &self.tail)
            .finish()
    }
}
