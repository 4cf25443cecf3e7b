//! Command definitions
//!
//! Requests a client can send to the store.

use crate::error::{DriftError, Result};

/// Wire byte for each command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Put = 0x02,
    // 0x03 is left unassigned: the store has no delete operation
    Ping = 0x04,
}

impl CommandType {
    /// Parse a command byte off the wire
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(CommandType::Get),
            0x02 => Ok(CommandType::Put),
            0x04 => Ok(CommandType::Ping),
            _ => Err(DriftError::Protocol(format!(
                "Unknown command type: 0x{:02x}",
                byte
            ))),
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read the value stored under a key
    Get { key: Vec<u8> },

    /// Store a value under a key
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Health check, answered with `PONG`
    Ping,
}

impl Command {
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Put { .. } => CommandType::Put,
            Command::Ping => CommandType::Ping,
        }
    }

    /// The key this command addresses, if any
    pub fn key(&self) -> Option<&[u8]> {
        match self {
            Command::Get { key } | Command::Put { key, .. } => Some(key),
            Command::Ping => None,
        }
    }
}
