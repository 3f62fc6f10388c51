//! Unframed passthrough protocol.

use crate::adapters::{Adapter, READ_CHUNK};
use crate::error::CommResult;
use crate::protocols::Protocol;

/// Raw protocol: bytes pass through the adapter unchanged, no framing
/// is added or stripped.
pub struct Raw<'a> {
    adapter: &'a mut dyn Adapter,
}

impl<'a> Raw<'a> {
    /// Wrap an adapter with no framing.
    pub fn new(adapter: &'a mut dyn Adapter) -> Self {
        Self { adapter }
    }
}

impl Protocol for Raw<'_> {
    fn write(&mut self, payload: &[u8]) -> CommResult<()> {
        self.adapter.write(payload)
    }

    fn read(&mut self) -> CommResult<Vec<u8>> {
        self.adapter.read(READ_CHUNK)
    }

    fn query(&mut self, payload: &[u8]) -> CommResult<Vec<u8>> {
        self.adapter.flush_read()?;
        self.write(payload)?;
        self.read()
    }
}
