//! DC power supply capability trait and drivers.

use crate::adapters::{Adapter, AdapterKind};
use crate::drivers::{ensure_adapter, parse_f64, Driver};
use crate::error::CommResult;
use crate::protocols::Delimited;

/// Single-channel DC power supply control.
pub trait PowerSupplyDc {
    /// Set the voltage setpoint in volts.
    fn set_voltage(&mut self, volts: f64) -> CommResult<()>;
    /// Get the voltage setpoint in volts.
    fn get_voltage(&mut self) -> CommResult<f64>;
    /// Set the current limit in amps.
    fn set_current(&mut self, amps: f64) -> CommResult<()>;
    /// Get the current limit in amps.
    fn get_current(&mut self) -> CommResult<f64>;
    /// Enable or disable the output.
    fn set_output_state(&mut self, enabled: bool) -> CommResult<()>;
}

/// Tenma 72-13360 30 V / 15 A bench power supply.
///
/// Line-oriented ASCII command set over its USB-serial port, one command
/// per `\n`-terminated line.
pub struct Tenma72_13360<'a> {
    prot: Delimited<'a>,
}

impl<'a> Tenma72_13360<'a> {
    /// Adapter kinds this driver accepts.
    pub const ACCEPTED_ADAPTERS: &'static [AdapterKind] =
        &[AdapterKind::Serial, AdapterKind::Loopback];

    /// Build the driver on an opened adapter.
    pub fn new(adapter: &'a mut dyn Adapter) -> CommResult<Self> {
        ensure_adapter(adapter.kind(), Self::ACCEPTED_ADAPTERS, "Tenma72_13360")?;
        Ok(Self {
            prot: Delimited::with_fixed_terminator(adapter, b"\n".to_vec()),
        })
    }

    /// Measure the actual output voltage in volts.
    pub fn measure_dc_voltage(&mut self) -> CommResult<f64> {
        let response = self
            .prot
            .query_str("VOUT?")
            .map_err(|e| e.with_command("VOUT?"))?;
        parse_f64(&response)
    }

    /// Measure the actual output current in amps.
    pub fn measure_dc_current(&mut self) -> CommResult<f64> {
        let response = self
            .prot
            .query_str("IOUT?")
            .map_err(|e| e.with_command("IOUT?"))?;
        parse_f64(&response)
    }

    /// Set the over-voltage protection threshold in volts.
    pub fn set_overvoltage_protection(&mut self, volts: f64) -> CommResult<()> {
        self.prot.write_str(&format!("OVP:{volts}"))
    }

    /// Set the over-current protection threshold in amps.
    pub fn set_overcurrent_protection(&mut self, amps: f64) -> CommResult<()> {
        self.prot.write_str(&format!("OCP:{amps}"))
    }
}

impl PowerSupplyDc for Tenma72_13360<'_> {
    fn set_voltage(&mut self, volts: f64) -> CommResult<()> {
        self.prot.write_str(&format!("VSET:{volts}"))
    }

    fn get_voltage(&mut self) -> CommResult<f64> {
        let response = self
            .prot
            .query_str("VSET?")
            .map_err(|e| e.with_command("VSET?"))?;
        parse_f64(&response)
    }

    fn set_current(&mut self, amps: f64) -> CommResult<()> {
        self.prot.write_str(&format!("ISET:{amps}"))
    }

    fn get_current(&mut self) -> CommResult<f64> {
        let response = self
            .prot
            .query_str("ISET?")
            .map_err(|e| e.with_command("ISET?"))?;
        parse_f64(&response)
    }

    fn set_output_state(&mut self, enabled: bool) -> CommResult<()> {
        self.prot
            .write_str(&format!("OUT:{}", if enabled { 1 } else { 0 }))
    }
}

impl Driver for Tenma72_13360<'_> {
    fn test(&mut self) -> CommResult<bool> {
        // A readable voltage setpoint is enough to tell the supply is
        // present and answering.
        match self.get_voltage() {
            Ok(_) => Ok(true),
            Err(crate::error::CommError::Value { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LoopbackAdapter;

    fn loopback_supply() -> LoopbackAdapter {
        let mut adapter = LoopbackAdapter::new().with_echo(false);
        adapter.stub_reply(b"VSET?\n".to_vec(), b"12.00\n".to_vec());
        adapter.stub_reply(b"ISET?\n".to_vec(), b"1.500\n".to_vec());
        adapter.stub_reply(b"VOUT?\n".to_vec(), b"11.98\n".to_vec());
        adapter.stub_reply(b"IOUT?\n".to_vec(), b"0.734\n".to_vec());
        adapter
    }

    #[test]
    fn test_setpoints_roundtrip() {
        let mut adapter = loopback_supply();
        adapter.open().unwrap();

        let mut psu = Tenma72_13360::new(&mut adapter).unwrap();
        psu.set_voltage(12.0).unwrap();
        assert_eq!(psu.get_voltage().unwrap(), 12.0);
        psu.set_current(1.5).unwrap();
        assert_eq!(psu.get_current().unwrap(), 1.5);
    }

    #[test]
    fn test_output_measurements() {
        let mut adapter = loopback_supply();
        adapter.open().unwrap();

        let mut psu = Tenma72_13360::new(&mut adapter).unwrap();
        assert_eq!(psu.measure_dc_voltage().unwrap(), 11.98);
        assert_eq!(psu.measure_dc_current().unwrap(), 0.734);
    }

    #[test]
    fn test_output_and_protection_commands() {
        let mut adapter = loopback_supply();
        adapter.open().unwrap();
        {
            let mut psu = Tenma72_13360::new(&mut adapter).unwrap();
            psu.set_output_state(true).unwrap();
            psu.set_overvoltage_protection(31.0).unwrap();
            psu.set_overcurrent_protection(2.0).unwrap();
        }
        let log = adapter.call_log();
        assert!(log.iter().any(|c| c.contains("OUT:1")));
        assert!(log.iter().any(|c| c.contains("OVP:31")));
        assert!(log.iter().any(|c| c.contains("OCP:2")));
    }

    #[test]
    fn test_presence_probe() {
        let mut adapter = loopback_supply();
        adapter.open().unwrap();

        let mut psu = Tenma72_13360::new(&mut adapter).unwrap();
        assert!(psu.test().unwrap());
    }
}
