//! Generic SCPI instrument driver.
//!
//! Covers the IEEE-488.2 common commands every SCPI instrument answers,
//! independent of instrument family. Family drivers embed the same
//! protocol and add their own command sets.

use crate::adapters::{Adapter, AdapterKind};
use crate::drivers::{ensure_adapter, Driver};
use crate::error::CommResult;
use crate::protocols::Scpi;

/// Driver for the SCPI common-command surface.
pub struct ScpiInstrument<'a> {
    prot: Scpi<'a>,
}

impl<'a> ScpiInstrument<'a> {
    /// Adapter kinds this driver accepts.
    pub const ACCEPTED_ADAPTERS: &'static [AdapterKind] =
        &[AdapterKind::Serial, AdapterKind::Tcp, AdapterKind::Loopback];

    /// Build the driver on an opened adapter.
    pub fn new(adapter: &'a mut dyn Adapter) -> CommResult<Self> {
        ensure_adapter(adapter.kind(), Self::ACCEPTED_ADAPTERS, "ScpiInstrument")?;
        Ok(Self {
            prot: Scpi::new(adapter),
        })
    }

    /// Identification string returned by `*IDN?`.
    pub fn get_identification(&mut self) -> CommResult<String> {
        self.prot
            .query_str("*IDN?")
            .map_err(|e| e.with_command("*IDN?"))
    }

    /// Last error issued by the instrument (`SYST:ERR?`).
    pub fn get_system_error(&mut self) -> CommResult<String> {
        self.prot
            .query_str("SYST:ERR?")
            .map_err(|e| e.with_command("SYST:ERR?"))
    }

    /// Firmware version (`SYST:VERS?`).
    pub fn get_version(&mut self) -> CommResult<String> {
        self.prot
            .query_str("SYST:VERS?")
            .map_err(|e| e.with_command("SYST:VERS?"))
    }

    /// Clear event registers and the error queue (`*CLS`).
    pub fn clear_status(&mut self) -> CommResult<()> {
        self.prot.write_str("*CLS")
    }

    /// Reset the instrument to factory state (`*RST`).
    pub fn reset(&mut self) -> CommResult<()> {
        self.prot.write_str("*RST")
    }
}

impl Driver for ScpiInstrument<'_> {
    fn test(&mut self) -> CommResult<bool> {
        Ok(!self.get_identification()?.is_empty())
    }
}
