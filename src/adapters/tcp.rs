//! TCP socket adapter for network-attached instruments.
//!
//! Most SCPI-capable bench instruments expose a raw socket (conventionally
//! port 5025). The read deadline is enforced by the OS via
//! `set_read_timeout`.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use log::debug;

use crate::adapters::{Adapter, AdapterKind, ConnectionState, DEFAULT_TIMEOUT};
use crate::config::TcpSettings;
use crate::error::{CommError, CommResult};

/// TCP adapter for socket-attached instruments.
pub struct TcpAdapter {
    /// Target address, "host:port".
    addr: String,
    timeout: Duration,
    state: ConnectionState,
    stream: Option<TcpStream>,
}

impl TcpAdapter {
    /// Create a new TCP adapter for `addr` ("host:port").
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: DEFAULT_TIMEOUT,
            state: ConnectionState::Closed,
            stream: None,
        }
    }

    /// Create an adapter from validated settings.
    pub fn from_settings(settings: &TcpSettings) -> CommResult<Self> {
        settings.validate()?;
        Ok(Self::new(format!("{}:{}", settings.host, settings.port)).with_timeout(settings.timeout))
    }

    /// Set the read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Target address this adapter connects to.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Adapter for TcpAdapter {
    fn open(&mut self) -> CommResult<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let stream = TcpStream::connect(&self.addr)
            .map_err(|e| CommError::Connection(format!("failed to connect to {}: {}", self.addr, e)))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(CommError::Io)?;
        stream.set_nodelay(true).map_err(CommError::Io)?;

        self.stream = Some(stream);
        self.state = ConnectionState::Open;
        debug!("connected to {}", self.addr);
        Ok(())
    }

    fn close(&mut self) -> CommResult<()> {
        if self.stream.take().is_some() {
            debug!("disconnected from {}", self.addr);
        }
        self.state = ConnectionState::Closed;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> CommResult<()> {
        let stream = self.stream.as_mut().ok_or(CommError::NotOpen)?;

        if let Err(e) = stream.write_all(data).and_then(|()| stream.flush()) {
            self.state = ConnectionState::Error;
            return Err(CommError::Io(e));
        }
        debug!("tcp wrote {} bytes to {}", data.len(), self.addr);
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> CommResult<Vec<u8>> {
        let timeout = self.timeout;
        let stream = self.stream.as_mut().ok_or(CommError::NotOpen)?;

        let mut buf = vec![0u8; max_len];
        match stream.read(&mut buf) {
            Ok(0) => {
                self.state = ConnectionState::Error;
                Err(CommError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed by peer",
                )))
            }
            Ok(n) => {
                buf.truncate(n);
                debug!("tcp read {} bytes from {}", n, self.addr);
                Ok(buf)
            }
            Err(e) => {
                let err = CommError::from_read_error(e, timeout);
                if matches!(err, CommError::Io(_)) {
                    self.state = ConnectionState::Error;
                }
                Err(err)
            }
        }
    }

    fn flush_read(&mut self) -> CommResult<()> {
        let stream = self.stream.as_mut().ok_or(CommError::NotOpen)?;

        stream.set_nonblocking(true).map_err(CommError::Io)?;
        let mut buf = [0u8; 256];
        let result = loop {
            match stream.read(&mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => debug!("tcp flushed {} stale bytes", n),
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break Ok(());
                }
                Err(e) => break Err(CommError::Io(e)),
            }
        };
        stream.set_nonblocking(false).map_err(CommError::Io)?;
        result
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Tcp
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
