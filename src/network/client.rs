//! TCP Client
//!
//! Blocking client for `driftkv-server`.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{DriftError, Result};
use crate::protocol::{read_response, write_command, Command};

/// A connection to a running server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Get a value; `Err(KeyNotFound)` if the key has no live record
    pub fn get(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        let value = self.call(Command::Get { key: key.to_vec() })?;
        // An empty value travels as an empty payload
        Ok(value.unwrap_or_default())
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.call(Command::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        Ok(())
    }

    pub fn ping(&mut self) -> Result<()> {
        match self.call(Command::Ping)? {
            Some(reply) if reply == b"PONG" => Ok(()),
            other => Err(DriftError::Protocol(format!(
                "unexpected PING reply: {:?}",
                other
            ))),
        }
    }

    /// Send one command and wait for its response
    fn call(&mut self, command: Command) -> Result<Option<Vec<u8>>> {
        write_command(&mut self.writer, &command)?;
        read_response(&mut self.reader)?.into_result()
    }
}
