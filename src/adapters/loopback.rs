//! In-memory loopback adapter for tests.
//!
//! Written bytes are queued and read back verbatim (echo mode), or
//! matched against stubbed command/reply pairs to simulate an
//! instrument. Supports failure injection and call logging for test
//! verification. No real I/O is performed.

use std::collections::VecDeque;
use std::time::Duration;

use log::debug;

use crate::adapters::{Adapter, AdapterKind, ConnectionState, DEFAULT_TIMEOUT};
use crate::error::{CommError, CommResult};

/// Loopback adapter: an in-memory byte channel.
///
/// # Example
///
/// ```
/// use labcomm::adapters::{Adapter, LoopbackAdapter};
///
/// let mut adapter = LoopbackAdapter::new();
/// adapter.open().unwrap();
/// adapter.write(b"hello").unwrap();
/// assert_eq!(adapter.read(64).unwrap(), b"hello");
/// ```
pub struct LoopbackAdapter {
    state: ConnectionState,
    /// Bytes available to the next read.
    rx: VecDeque<u8>,
    /// Written bytes are queued back for reading when set.
    echo: bool,
    /// Scripted replies: when a write matches a command exactly, the
    /// reply is queued for reading.
    replies: Vec<(Vec<u8>, Vec<u8>)>,
    fail_next: bool,
    call_log: Vec<String>,
    timeout: Duration,
}

impl Default for LoopbackAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackAdapter {
    /// Create a loopback adapter in echo mode.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Closed,
            rx: VecDeque::new(),
            echo: true,
            replies: Vec::new(),
            fail_next: false,
            call_log: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Enable or disable echoing of written bytes.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Set the simulated read timeout reported by failing reads.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stub a reply: whenever `command` is written verbatim, `reply` is
    /// queued for the next read. Stubs are matched before echo and may
    /// fire repeatedly.
    pub fn stub_reply(&mut self, command: impl Into<Vec<u8>>, reply: impl Into<Vec<u8>>) {
        self.replies.push((command.into(), reply.into()));
    }

    /// Queue bytes directly for the next read.
    pub fn push_response(&mut self, data: impl AsRef<[u8]>) {
        self.rx.extend(data.as_ref());
    }

    /// Inject a failure for the next operation.
    pub fn inject_next_failure(&mut self) {
        self.fail_next = true;
    }

    /// Number of bytes currently buffered for reading.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Calls recorded so far.
    pub fn call_log(&self) -> &[String] {
        &self.call_log
    }

    fn check_failure(&mut self) -> bool {
        std::mem::take(&mut self.fail_next)
    }

    fn log_call(&mut self, call: String) {
        self.call_log.push(call);
    }
}

impl Adapter for LoopbackAdapter {
    fn open(&mut self) -> CommResult<()> {
        self.log_call("open".to_string());
        if self.check_failure() {
            self.state = ConnectionState::Error;
            return Err(CommError::Connection("injected failure".to_string()));
        }
        self.state = ConnectionState::Open;
        Ok(())
    }

    fn close(&mut self) -> CommResult<()> {
        self.log_call("close".to_string());
        self.state = ConnectionState::Closed;
        self.rx.clear();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> CommResult<()> {
        self.log_call(format!("write: {}", String::from_utf8_lossy(data).escape_debug()));
        if self.check_failure() {
            return Err(CommError::Io(std::io::Error::other("injected failure")));
        }
        if self.state != ConnectionState::Open {
            return Err(CommError::NotOpen);
        }

        let stubbed = self
            .replies
            .iter()
            .find(|(command, _)| command == data)
            .map(|(_, reply)| reply.clone());
        if let Some(reply) = stubbed {
            self.rx.extend(&reply);
        } else if self.echo {
            self.rx.extend(data);
        }
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> CommResult<Vec<u8>> {
        self.log_call("read".to_string());
        if self.check_failure() {
            return Err(CommError::Io(std::io::Error::other("injected failure")));
        }
        if self.state != ConnectionState::Open {
            return Err(CommError::NotOpen);
        }
        if self.rx.is_empty() {
            // Nothing will ever arrive; report the timeout immediately.
            return Err(CommError::Timeout { after: self.timeout });
        }

        let n = max_len.min(self.rx.len());
        let data: Vec<u8> = self.rx.drain(..n).collect();
        debug!("loopback read {} bytes", data.len());
        Ok(data)
    }

    fn flush_read(&mut self) -> CommResult<()> {
        if self.state != ConnectionState::Open {
            return Err(CommError::NotOpen);
        }
        self.rx.clear();
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Loopback
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
