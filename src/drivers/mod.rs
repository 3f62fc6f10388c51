//! Instrument device drivers.
//!
//! A driver borrows an opened adapter, validates once at construction
//! that the adapter's transport is acceptable for the instrument, builds
//! its protocol internally and exposes typed, instrument-specific
//! operations. The caller that opened the adapter keeps ownership and
//! closes it after dropping the driver.

use crate::adapters::AdapterKind;
use crate::error::{CommError, CommResult};

pub mod multimeter;
pub mod powersupply;
pub mod scpi;

pub use multimeter::{Ammeter, Ohmmeter, Sdm3055, Voltmeter};
pub use powersupply::{PowerSupplyDc, Tenma72_13360};
pub use scpi::ScpiInstrument;

/// Common surface of all device drivers.
pub trait Driver {
    /// Probe device presence and basic sanity.
    ///
    /// Implementations should use an exchange that detects that the
    /// device is present, responds to queries, and where possible is the
    /// expected model. Returns `Ok(false)` for a reachable but wrong
    /// device; communication failures propagate as errors.
    fn test(&mut self) -> CommResult<bool>;
}

/// Validate an adapter/driver pairing.
///
/// Called exactly once per driver construction; per-call re-checks are
/// deliberately absent.
pub fn ensure_adapter(
    kind: AdapterKind,
    accepted: &[AdapterKind],
    driver: &str,
) -> CommResult<()> {
    if accepted.contains(&kind) {
        Ok(())
    } else {
        Err(CommError::Configuration(format!(
            "{} does not support {} adapters (accepted: {})",
            driver,
            kind,
            accepted
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Convert a decoded response to `f64`, surfacing a `Value` error with
/// the offending response on failure.
pub(crate) fn parse_f64(response: &str) -> CommResult<f64> {
    response
        .trim()
        .parse::<f64>()
        .map_err(|_| CommError::Value {
            response: response.to_string(),
            expected: "floating point number",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_adapter() {
        let accepted = &[AdapterKind::Tcp, AdapterKind::Loopback];
        assert!(ensure_adapter(AdapterKind::Tcp, accepted, "Sdm3055").is_ok());

        let err = ensure_adapter(AdapterKind::Serial, accepted, "Sdm3055").unwrap_err();
        assert!(matches!(err, CommError::Configuration(_)));
        assert!(err.to_string().contains("serial"));
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(" 1.234\r").unwrap(), 1.234);
        assert_eq!(parse_f64("-2.5e-3").unwrap(), -0.0025);
        assert!(matches!(
            parse_f64("OVERLOAD"),
            Err(CommError::Value { .. })
        ));
    }
}
