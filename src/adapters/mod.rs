//! Byte-level transport adapters.
//!
//! An [`Adapter`] owns a raw communication channel to a physical or
//! virtual device and exposes blocking byte I/O plus the connection
//! lifecycle. Adapters know nothing about commands or devices; framing
//! belongs to the protocol layer.

use std::time::Duration;

use crate::error::CommResult;

pub mod loopback;
#[cfg(feature = "adapter_serial")]
pub mod serial;
pub mod tcp;

pub use loopback::LoopbackAdapter;
#[cfg(feature = "adapter_serial")]
pub use serial::SerialAdapter;
pub use tcp::TcpAdapter;

/// Connection lifecycle state of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Channel is not open; no I/O permitted.
    Closed,
    /// Channel is open and usable.
    Open,
    /// A transport fault occurred; the owner should close and reopen.
    Error,
}

/// Transport family of an adapter.
///
/// Drivers declare the kinds they accept and validate the pairing once at
/// construction, instead of inspecting concrete types at every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// RS-232 / USB-serial line.
    Serial,
    /// TCP socket.
    Tcp,
    /// In-memory loopback used in tests.
    Loopback,
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterKind::Serial => write!(f, "serial"),
            AdapterKind::Tcp => write!(f, "tcp"),
            AdapterKind::Loopback => write!(f, "loopback"),
        }
    }
}

/// Blocking byte-oriented transport to an instrument.
///
/// Invariant: `write` and `read` are only permitted while
/// [`state`](Adapter::state) is [`ConnectionState::Open`] and fail with
/// [`CommError::NotOpen`](crate::CommError::NotOpen) otherwise. The owner
/// that opened the adapter is responsible for closing it.
pub trait Adapter {
    /// Open the underlying channel.
    ///
    /// Fails with `Connection` on transport failure.
    fn open(&mut self) -> CommResult<()>;

    /// Close the underlying channel and release it.
    ///
    /// Idempotent: closing an already-closed adapter succeeds and leaves
    /// the state unchanged.
    fn close(&mut self) -> CommResult<()>;

    /// Write raw bytes to the channel.
    fn write(&mut self, data: &[u8]) -> CommResult<()>;

    /// Read up to `max_len` bytes, blocking until data arrives or the
    /// configured timeout elapses.
    ///
    /// Fails with `Timeout` if no data arrived within the deadline and
    /// with `Io` if the connection dropped.
    fn read(&mut self, max_len: usize) -> CommResult<Vec<u8>>;

    /// Discard any pending unread input.
    fn flush_read(&mut self) -> CommResult<()>;

    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Transport family, used for the one-time driver pairing check.
    fn kind(&self) -> AdapterKind;

    /// Configured read timeout.
    fn timeout(&self) -> Duration;
}

/// Default read timeout applied by adapters when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Read chunk size used by adapters and protocols.
pub(crate) const READ_CHUNK: usize = 256;
