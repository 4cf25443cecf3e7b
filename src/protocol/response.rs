//! Response definitions
//!
//! What the server sends back for each command.

use crate::error::{DriftError, Result};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

impl Status {
    /// Parse a status byte off the wire
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Status::Ok),
            0x01 => Ok(Status::NotFound),
            0x02 => Ok(Status::Error),
            _ => Err(DriftError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                byte
            ))),
        }
    }
}

/// A response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,

    /// Value for GET, `PONG` for PING, message for ERROR
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR response carrying a UTF-8 message
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Map a store result onto the wire: NotFound gets its own status
    pub fn from_result(result: Result<Option<Vec<u8>>>) -> Self {
        match result {
            Ok(payload) => Response::ok(payload),
            Err(DriftError::KeyNotFound) => Response::not_found(),
            Err(e) => Response::error(&e.to_string()),
        }
    }

    /// Convert back into a client-side result
    pub fn into_result(self) -> Result<Option<Vec<u8>>> {
        match self.status {
            Status::Ok => Ok(self.payload),
            Status::NotFound => Err(DriftError::KeyNotFound),
            Status::Error => {
                let message = self
                    .payload
                    .map(|p| String::from_utf8_lossy(&p).into_owned())
                    .unwrap_or_default();
                Err(DriftError::Network(message))
            }
        }
    }
}
