//! SCPI line protocol.
//!
//! `\n`-delimited framing plus command hygiene: a command containing a
//! carriage return or line feed would be split into two instrument
//! commands, so it is rejected before any I/O.

use crate::adapters::Adapter;
use crate::error::{CommError, CommResult};
use crate::protocols::delimited::{decode_utf8, Delimited};
use crate::protocols::Protocol;

/// SCPI protocol over any byte-stream adapter.
pub struct Scpi<'a> {
    inner: Delimited<'a>,
}

impl<'a> Scpi<'a> {
    /// Conventional raw-socket port for SCPI over TCP.
    pub const DEFAULT_PORT: u16 = 5025;

    /// Wrap an adapter with SCPI framing.
    pub fn new(adapter: &'a mut dyn Adapter) -> Self {
        Self {
            inner: Delimited::with_fixed_terminator(adapter, b"\n".to_vec()),
        }
    }

    /// Send a string command.
    pub fn write_str(&mut self, command: &str) -> CommResult<()> {
        self.write(command.as_bytes())
    }

    /// Query with a string command, decoding the response as UTF-8.
    pub fn query_str(&mut self, command: &str) -> CommResult<String> {
        decode_utf8(self.query(command.as_bytes())?)
    }

    fn check_command(payload: &[u8]) -> CommResult<()> {
        if payload.iter().any(|b| *b == b'\n' || *b == b'\r') {
            return Err(CommError::Protocol(
                "command must not contain CR or LF".to_string(),
            ));
        }
        Ok(())
    }
}

impl Protocol for Scpi<'_> {
    fn write(&mut self, payload: &[u8]) -> CommResult<()> {
        Self::check_command(payload)?;
        self.inner.write(payload)
    }

    fn read(&mut self) -> CommResult<Vec<u8>> {
        self.inner.read()
    }

    fn query(&mut self, payload: &[u8]) -> CommResult<Vec<u8>> {
        Self::check_command(payload)?;
        self.inner.query(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LoopbackAdapter;

    #[test]
    fn test_embedded_newline_rejected_before_io() {
        let mut adapter = LoopbackAdapter::new();
        adapter.open().unwrap();
        {
            let mut prot = Scpi::new(&mut adapter);
            assert!(matches!(
                prot.write(b"*IDN?\n*RST"),
                Err(CommError::Protocol(_))
            ));
            assert!(matches!(
                prot.query(b"bad\rcommand"),
                Err(CommError::Protocol(_))
            ));
        }
        // Only "open" logged; nothing reached the adapter.
        assert_eq!(adapter.call_log().len(), 1);
    }

    #[test]
    fn test_query_roundtrip() {
        let mut adapter = LoopbackAdapter::new().with_echo(false);
        adapter.stub_reply(b"*IDN?\n".to_vec(), b"ACME,MODEL1,0,1.0\n".to_vec());
        adapter.open().unwrap();

        let mut prot = Scpi::new(&mut adapter);
        assert_eq!(prot.query_str("*IDN?").unwrap(), "ACME,MODEL1,0,1.0");
    }
}
