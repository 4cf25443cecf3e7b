//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! Every message is one frame:
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Kind (1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//! `Kind` is a command type on requests and a status on responses.
//!
//! ### Payload by Command Type
//! - GET:  key_len (4 bytes) + key
//! - PUT:  key_len (4 bytes) + key + value
//! - PING: empty

use std::io::{Read, Write};

use bytes::{Buf, BufMut};

use super::{Command, CommandType, Response, Status};
use crate::error::{DriftError, Result};

/// Frame header size: 1 byte kind + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Framing
// =============================================================================

fn frame(kind: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(kind);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message
}

fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE as usize {
        return Err(DriftError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

/// Split a complete frame into (kind, payload)
fn unframe(bytes: &[u8]) -> Result<(u8, &[u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(DriftError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let kind = header.get_u8();
    let payload_len = header.get_u32() as usize;
    check_payload_len(payload_len)?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(DriftError::Protocol(format!(
            "Incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    Ok((kind, &bytes[HEADER_SIZE..total_len]))
}

/// Blocking read of one whole frame
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = (&header[1..]).get_u32() as usize;
    check_payload_len(payload_len)?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    reader.read_exact(&mut message[HEADER_SIZE..])?;

    Ok(message)
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Vec<u8> {
    let payload = match command {
        Command::Get { key } => {
            let mut payload = Vec::with_capacity(4 + key.len());
            payload.put_u32(key.len() as u32);
            payload.put_slice(key);
            payload
        }
        Command::Put { key, value } => {
            let mut payload = Vec::with_capacity(4 + key.len() + value.len());
            payload.put_u32(key.len() as u32);
            payload.put_slice(key);
            payload.put_slice(value);
            payload
        }
        Command::Ping => Vec::new(),
    };

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from one complete frame
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (kind, payload) = unframe(bytes)?;

    match CommandType::from_u8(kind)? {
        CommandType::Get => {
            let (key, rest) = split_key("GET", payload)?;
            if !rest.is_empty() {
                return Err(DriftError::Protocol(format!(
                    "GET command: {} trailing bytes after key",
                    rest.len()
                )));
            }
            Ok(Command::Get { key: key.to_vec() })
        }
        CommandType::Put => {
            let (key, value) = split_key("PUT", payload)?;
            Ok(Command::Put {
                key: key.to_vec(),
                value: value.to_vec(),
            })
        }
        CommandType::Ping => {
            if !payload.is_empty() {
                return Err(DriftError::Protocol(format!(
                    "PING command: unexpected payload of {} bytes",
                    payload.len()
                )));
            }
            Ok(Command::Ping)
        }
    }
}

/// Split `key_len(4) ‖ key ‖ rest` into (key, rest)
fn split_key<'a>(name: &str, payload: &'a [u8]) -> Result<(&'a [u8], &'a [u8])> {
    if payload.len() < 4 {
        return Err(DriftError::Protocol(format!(
            "{} command: missing key length",
            name
        )));
    }

    let key_len = (&payload[..4]).get_u32() as usize;
    let body = &payload[4..];
    if body.len() < key_len {
        return Err(DriftError::Protocol(format!(
            "{} command: incomplete key (expected {}, got {})",
            name,
            key_len,
            body.len()
        )));
    }

    Ok(body.split_at(key_len))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from one complete frame
///
/// An empty payload decodes as `None`.
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (kind, payload) = unframe(bytes)?;
    let status = Status::from_u8(kind)?;

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    decode_command(&read_frame(reader)?)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&encode_command(command))?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    decode_response(&read_frame(reader)?)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response))?;
    writer.flush()?;
    Ok(())
}
