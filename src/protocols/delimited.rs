//! Terminator-delimited framing.
//!
//! Commands are sent with exactly one terminator appended; responses are
//! accumulated until the terminator appears, which is then stripped.
//! Bytes received past the terminator stay buffered for the next read,
//! so back-to-back responses are never merged or lost.

use log::debug;

use crate::adapters::{Adapter, READ_CHUNK};
use crate::error::{CommError, CommResult};
use crate::protocols::Protocol;

/// Command/response protocol with terminator framing (e.g. LF, CR or
/// CRLF terminated ASCII).
pub struct Delimited<'a> {
    adapter: &'a mut dyn Adapter,
    terminator: Vec<u8>,
    /// Residual bytes received past the last terminator.
    buffer: Vec<u8>,
}

impl<'a> Delimited<'a> {
    /// Wrap an adapter with the given terminator.
    ///
    /// Fails with `Configuration` if the terminator is empty.
    pub fn new(adapter: &'a mut dyn Adapter, terminator: impl Into<Vec<u8>>) -> CommResult<Self> {
        let terminator = terminator.into();
        if terminator.is_empty() {
            return Err(CommError::Configuration(
                "terminator must not be empty".to_string(),
            ));
        }
        Ok(Self::with_fixed_terminator(adapter, terminator))
    }

    pub(crate) fn with_fixed_terminator(adapter: &'a mut dyn Adapter, terminator: Vec<u8>) -> Self {
        Self {
            adapter,
            terminator,
            buffer: Vec::new(),
        }
    }

    /// The configured terminator bytes.
    pub fn terminator(&self) -> &[u8] {
        &self.terminator
    }

    /// Number of residual bytes buffered past the last terminator.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Send a string command.
    pub fn write_str(&mut self, command: &str) -> CommResult<()> {
        self.write(command.as_bytes())
    }

    /// Read one response and decode it as UTF-8.
    pub fn read_str(&mut self) -> CommResult<String> {
        decode_utf8(self.read()?)
    }

    /// Query with a string command, decoding the response as UTF-8.
    pub fn query_str(&mut self, command: &str) -> CommResult<String> {
        decode_utf8(self.query(command.as_bytes())?)
    }

    fn find_terminator(&self) -> Option<usize> {
        self.buffer
            .windows(self.terminator.len())
            .position(|window| window == self.terminator)
    }
}

pub(crate) fn decode_utf8(bytes: Vec<u8>) -> CommResult<String> {
    String::from_utf8(bytes)
        .map_err(|_| CommError::Protocol("response is not valid UTF-8".to_string()))
}

impl Protocol for Delimited<'_> {
    fn write(&mut self, payload: &[u8]) -> CommResult<()> {
        let mut framed = Vec::with_capacity(payload.len() + self.terminator.len());
        framed.extend_from_slice(payload);
        framed.extend_from_slice(&self.terminator);
        self.adapter.write(&framed)?;
        debug!("sent command: {}", String::from_utf8_lossy(payload));
        Ok(())
    }

    fn read(&mut self) -> CommResult<Vec<u8>> {
        loop {
            if let Some(pos) = self.find_terminator() {
                let mut message: Vec<u8> = self.buffer.drain(..pos + self.terminator.len()).collect();
                message.truncate(pos);
                debug!("received response: {}", String::from_utf8_lossy(&message));
                return Ok(message);
            }
            // Partial data stays buffered; a timeout here surfaces the
            // adapter's error unchanged.
            let chunk = self.adapter.read(READ_CHUNK)?;
            self.buffer.extend_from_slice(&chunk);
        }
    }

    fn query(&mut self, payload: &[u8]) -> CommResult<Vec<u8>> {
        self.buffer.clear();
        self.adapter.flush_read()?;
        self.write(payload)?;
        self.read()
    }
}
