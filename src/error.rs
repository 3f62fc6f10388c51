//! Error types shared by all communication layers.
//!
//! [`CommError`] is the single error type for the crate. The variants map
//! one-to-one onto the failure modes of the three layers:
//!
//! - `Connection`, `Io`, `Timeout`, `NotOpen` originate in adapters,
//! - `Protocol` originates in protocol framing/decoding,
//! - `Configuration` and `Value` originate in driver construction and
//!   response conversion.
//!
//! Lower-layer errors are never swallowed or retried: protocols pass
//! adapter errors through unchanged, and drivers may only wrap them with
//! the command that was in flight (the `Command` variant keeps the
//! original as its source).

use std::time::Duration;

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type CommResult<T> = std::result::Result<T, CommError>;

/// Error type for adapter, protocol and driver operations.
#[derive(Error, Debug)]
pub enum CommError {
    /// Opening the transport failed, or the transport dropped while
    /// establishing the connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// Read or write failure on an open adapter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No data arrived within the configured deadline.
    #[error("timed out after {after:?}")]
    Timeout {
        /// The deadline that elapsed.
        after: Duration,
    },

    /// Read or write attempted while the adapter is not open.
    #[error("adapter is not open")]
    NotOpen,

    /// Framing or decoding failure, or a malformed command rejected
    /// before any I/O.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Invalid settings, or an adapter/driver pairing rejected at
    /// construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A response was received but could not be converted to the
    /// expected type.
    #[error("invalid response {response:?}: expected {expected}")]
    Value {
        /// The decoded response as received.
        response: String,
        /// Description of the expected form.
        expected: &'static str,
    },

    /// A lower-layer error annotated with the command that was being
    /// executed. The original error is preserved as the source.
    #[error("command {command:?} failed: {source}")]
    Command {
        /// The command in flight when the failure occurred.
        command: String,
        /// The underlying failure.
        #[source]
        source: Box<CommError>,
    },
}

impl CommError {
    /// Wrap this error with the command that was being executed.
    ///
    /// Used by drivers to add context without discarding the cause.
    pub fn with_command(self, command: impl Into<String>) -> Self {
        CommError::Command {
            command: command.into(),
            source: Box::new(self),
        }
    }

    /// Map an I/O error from a blocking read to the crate taxonomy.
    ///
    /// The OS reports an elapsed read deadline as `TimedOut` (or
    /// `WouldBlock` on some platforms); everything else is a genuine I/O
    /// failure.
    pub fn from_read_error(err: std::io::Error, timeout: Duration) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                CommError::Timeout { after: timeout }
            }
            _ => CommError::Io(err),
        }
    }

    /// True if this error (or its wrapped source) is a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            CommError::Timeout { .. } => true,
            CommError::Command { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}
