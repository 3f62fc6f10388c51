//! Message framing over an adapter's byte stream.
//!
//! A [`Protocol`] borrows exactly one [`Adapter`](crate::adapters::Adapter)
//! for its lifetime and turns the byte stream into logical messages. It
//! never manages the adapter's lifecycle; the caller that opened the
//! adapter closes it.
//!
//! Three framings are provided:
//!
//! - [`Raw`]: no framing, bytes pass through unchanged.
//! - [`Delimited`]: terminator-based framing (e.g. `\n`-terminated ASCII).
//! - [`Scpi`]: `\n`-delimited SCPI with command hygiene checks.

use crate::error::CommResult;

pub mod delimited;
pub mod raw;
pub mod scpi;

pub use delimited::Delimited;
pub use raw::Raw;
pub use scpi::Scpi;

/// Logical-message I/O over a borrowed adapter.
///
/// Adapter errors (`Io`, `Timeout`, `NotOpen`) propagate through
/// unchanged; protocols add only `Protocol` errors of their own.
pub trait Protocol {
    /// Encode and send one logical message.
    fn write(&mut self, payload: &[u8]) -> CommResult<()>;

    /// Receive and decode one logical message.
    fn read(&mut self) -> CommResult<Vec<u8>>;

    /// Discard pending input, send `payload` and read the response.
    ///
    /// The flush guards against stale bytes from an earlier exchange
    /// being taken for this response.
    fn query(&mut self, payload: &[u8]) -> CommResult<Vec<u8>>;
}
