//! Layered instrument communication.
//!
//! The crate is organised as three thin layers, each depending only on the
//! one below it:
//!
//! - [`adapters`] own a raw byte channel to the device (serial line, TCP
//!   socket, in-memory loopback) and expose blocking byte I/O plus the
//!   connection lifecycle.
//! - [`protocols`] frame logical messages over an adapter's byte stream
//!   (raw passthrough, terminator-delimited, SCPI).
//! - [`drivers`] expose instrument-specific typed operations built from
//!   protocol-level exchanges.
//!
//! Swapping the adapter reuses a driver across transports; swapping the
//! protocol reuses a transport across command languages.
//!
//! All calls are synchronous and block until the adapter read completes or
//! times out. Instances are not safe for concurrent use without external
//! serialization.

pub mod adapters;
pub mod config;
pub mod drivers;
pub mod error;
pub mod protocols;

pub use error::{CommError, CommResult};
