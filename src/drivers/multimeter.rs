//! Multimeter capability traits and drivers.

use crate::adapters::{Adapter, AdapterKind};
use crate::drivers::{ensure_adapter, parse_f64, Driver};
use crate::error::CommResult;
use crate::protocols::Scpi;

/// Provides voltage measurements.
pub trait Voltmeter {
    /// Measure DC voltage in volts.
    fn measure_dc_voltage(&mut self) -> CommResult<f64>;
    /// Measure AC voltage in volts.
    fn measure_ac_voltage(&mut self) -> CommResult<f64>;
}

/// Provides current measurements.
pub trait Ammeter {
    /// Measure DC current in amps.
    fn measure_dc_current(&mut self) -> CommResult<f64>;
    /// Measure AC current in amps.
    fn measure_ac_current(&mut self) -> CommResult<f64>;
}

/// Provides resistance measurements (2-wire implied).
pub trait Ohmmeter {
    /// Measure resistance in ohms.
    fn measure_resistance(&mut self) -> CommResult<f64>;
}

/// Siglent SDM3055 5½ digit bench multimeter.
///
/// Speaks SCPI over its LAN socket; serial adapters are rejected at
/// construction. Each measurement configures the function, triggers a
/// single acquisition and fetches the reading.
pub struct Sdm3055<'a> {
    prot: Scpi<'a>,
}

impl<'a> Sdm3055<'a> {
    /// Adapter kinds this driver accepts.
    pub const ACCEPTED_ADAPTERS: &'static [AdapterKind] =
        &[AdapterKind::Tcp, AdapterKind::Loopback];

    /// Build the driver on an opened adapter.
    ///
    /// Fails with `Configuration` for transports the instrument does not
    /// expose (serial).
    pub fn new(adapter: &'a mut dyn Adapter) -> CommResult<Self> {
        ensure_adapter(adapter.kind(), Self::ACCEPTED_ADAPTERS, "Sdm3055")?;
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

    /// Configure `conf`, trigger one acquisition and fetch the reading.
    fn measure(&mut self, conf: &str) -> CommResult<f64> {
        self.prot.write_str(conf)?;
        self.prot.write_str("INIT")?;
        self.prot.write_str("*TRG")?;
        let response = self
            .prot
            .query_str("FETC?")
            .map_err(|e| e.with_command("FETC?"))?;
        parse_f64(&response)
    }
}

impl Voltmeter for Sdm3055<'_> {
    fn measure_dc_voltage(&mut self) -> CommResult<f64> {
        self.measure("CONF:VOLT:DC")
    }

    fn measure_ac_voltage(&mut self) -> CommResult<f64> {
        self.measure("CONF:VOLT:AC")
    }
}

impl Ammeter for Sdm3055<'_> {
    fn measure_dc_current(&mut self) -> CommResult<f64> {
        self.measure("CONF:CURR:DC")
    }

    fn measure_ac_current(&mut self) -> CommResult<f64> {
        self.measure("CONF:CURR:AC")
    }
}

impl Driver for Sdm3055<'_> {
    fn test(&mut self) -> CommResult<bool> {
        Ok(self.get_identification()?.contains("SDM3055"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LoopbackAdapter;
    use crate::error::CommError;

    fn loopback_sdm3055() -> LoopbackAdapter {
        let mut adapter = LoopbackAdapter::new().with_echo(false);
        adapter.stub_reply(
            b"*IDN?\n".to_vec(),
            b"Siglent Technologies,SDM3055,SDM35AB1234567,1.01.01.19\n".to_vec(),
        );
        adapter.stub_reply(b"FETC?\n".to_vec(), b"+1.23400000E+00\n".to_vec());
        adapter
    }

    #[test]
    fn test_measure_dc_voltage() {
        let mut adapter = loopback_sdm3055();
        adapter.open().unwrap();

        let mut mm = Sdm3055::new(&mut adapter).unwrap();
        assert_eq!(mm.measure_dc_voltage().unwrap(), 1.234);
    }

    #[test]
    fn test_measurement_sequence_order() {
        let mut adapter = loopback_sdm3055();
        adapter.open().unwrap();
        {
            let mut mm = Sdm3055::new(&mut adapter).unwrap();
            mm.measure_dc_voltage().unwrap();
        }

        let writes: Vec<&String> = adapter
            .call_log()
            .iter()
            .filter(|c| c.starts_with("write"))
            .collect();
        assert!(writes[0].contains("CONF:VOLT:DC"));
        assert!(writes[1].contains("INIT"));
        assert!(writes[2].contains("*TRG"));
        assert!(writes[3].contains("FETC?"));
    }

    #[test]
    fn test_unparseable_reading_is_value_error() {
        let mut adapter = LoopbackAdapter::new().with_echo(false);
        adapter.stub_reply(b"FETC?\n".to_vec(), b"OVERLOAD\n".to_vec());
        adapter.open().unwrap();

        let mut mm = Sdm3055::new(&mut adapter).unwrap();
        assert!(matches!(
            mm.measure_dc_voltage(),
            Err(CommError::Value { .. })
        ));
    }

    #[test]
    fn test_model_probe() {
        let mut adapter = loopback_sdm3055();
        adapter.open().unwrap();

        let mut mm = Sdm3055::new(&mut adapter).unwrap();
        assert!(mm.test().unwrap());
    }
}
