//! Serial adapter for RS-232 / USB-serial instruments.
//!
//! Wraps the `serialport` crate. The port is opened with a short internal
//! poll timeout and reads loop until the adapter's configured deadline,
//! so a slow instrument is distinguished from a silent one.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use log::debug;
use serialport::SerialPort;

use crate::adapters::{Adapter, AdapterKind, ConnectionState, DEFAULT_TIMEOUT};
use crate::config::SerialSettings;
use crate::error::{CommError, CommResult};

/// Internal poll interval for the underlying port; the adapter-level
/// timeout is enforced by the read loop.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Serial adapter for RS-232 communication.
pub struct SerialAdapter {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3").
    port_name: String,
    /// Baud rate (e.g., 9600, 115200).
    baud_rate: u32,
    /// Read timeout.
    timeout: Duration,
    state: ConnectionState,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialAdapter {
    /// Create a new serial adapter with default settings.
    ///
    /// # Arguments
    /// * `port_name` - Serial port path (e.g., "/dev/ttyUSB0", "COM3")
    /// * `baud_rate` - Communication speed (e.g., 9600, 115200)
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            timeout: DEFAULT_TIMEOUT,
            state: ConnectionState::Closed,
            port: None,
        }
    }

    /// Create an adapter from validated settings.
    pub fn from_settings(settings: &SerialSettings) -> CommResult<Self> {
        settings.validate()?;
        Ok(Self::new(settings.port.clone(), settings.baud_rate).with_timeout(settings.timeout))
    }

    /// Set the read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Port name this adapter targets.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl Adapter for SerialAdapter {
    fn open(&mut self) -> CommResult<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let port = serialport::new(&self.port_name, self.baud_rate)
            .timeout(POLL_INTERVAL)
            .open()
            .map_err(|e| {
                CommError::Connection(format!(
                    "failed to open serial port '{}' at {} baud: {}",
                    self.port_name, self.baud_rate, e
                ))
            })?;

        self.port = Some(port);
        self.state = ConnectionState::Open;
        debug!("serial port '{}' opened at {} baud", self.port_name, self.baud_rate);
        Ok(())
    }

    fn close(&mut self) -> CommResult<()> {
        if self.port.take().is_some() {
            debug!("serial port '{}' closed", self.port_name);
        }
        self.state = ConnectionState::Closed;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> CommResult<()> {
        let port = self.port.as_mut().ok_or(CommError::NotOpen)?;

        if let Err(e) = port.write_all(data).and_then(|()| port.flush()) {
            self.state = ConnectionState::Error;
            return Err(CommError::Io(e));
        }
        debug!("serial wrote {} bytes", data.len());
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> CommResult<Vec<u8>> {
        let timeout = self.timeout;
        let port = self.port.as_mut().ok_or(CommError::NotOpen)?;

        let mut buf = vec![0u8; max_len];
        let deadline = Instant::now() + timeout;

        loop {
            match port.read(&mut buf) {
                Ok(0) => {
                    self.state = ConnectionState::Error;
                    return Err(CommError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "unexpected EOF from serial port",
                    )));
                }
                Ok(n) => {
                    buf.truncate(n);
                    debug!("serial read {} bytes", n);
                    return Ok(buf);
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    // Port poll timeout is shorter than the adapter deadline.
                    if Instant::now() >= deadline {
                        return Err(CommError::Timeout { after: timeout });
                    }
                }
                Err(e) => {
                    self.state = ConnectionState::Error;
                    return Err(CommError::Io(e));
                }
            }
        }
    }

    fn flush_read(&mut self) -> CommResult<()> {
        let port = self.port.as_mut().ok_or(CommError::NotOpen)?;
        port.clear(serialport::ClearBuffer::Input)
            .map_err(|e| CommError::Io(e.into()))
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Serial
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
