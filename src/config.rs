//! Typed settings for adapter construction.
//!
//! Settings are plain serde structs loaded from TOML. Durations use
//! humantime notation ("500ms", "2s"). Parsing catches format errors;
//! [`validate`](SerialSettings::validate) catches values that parse but
//! are logically wrong, reported as `Configuration` errors.
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//! timeout = "500ms"
//!
//! [tcp]
//! host = "192.168.1.50"
//! timeout = "2s"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::DEFAULT_TIMEOUT;
use crate::error::{CommError, CommResult};
use crate::protocols::Scpi;

/// Settings for a serial adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SerialSettings {
    /// Serial port path (e.g., "/dev/ttyUSB0", "COM3").
    pub port: String,
    /// Communication speed in baud.
    pub baud_rate: u32,
    /// Read timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Command terminator.
    pub terminator: String,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 9600,
            timeout: DEFAULT_TIMEOUT,
            terminator: "\n".to_string(),
        }
    }
}

impl SerialSettings {
    /// Semantic validation beyond what parsing guarantees.
    pub fn validate(&self) -> CommResult<()> {
        if self.port.is_empty() {
            return Err(CommError::Configuration(
                "serial port name must not be empty".to_string(),
            ));
        }
        if self.baud_rate == 0 {
            return Err(CommError::Configuration(
                "baud rate must be non-zero".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(CommError::Configuration(
                "timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for a TCP adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TcpSettings {
    /// Instrument hostname or IP address.
    pub host: String,
    /// TCP port; defaults to the conventional SCPI raw-socket port.
    pub port: u16,
    /// Read timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for TcpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: Scpi::DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TcpSettings {
    /// Semantic validation beyond what parsing guarantees.
    pub fn validate(&self) -> CommResult<()> {
        if self.host.is_empty() {
            return Err(CommError::Configuration(
                "host must not be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(CommError::Configuration(
                "timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level settings document: one optional endpoint per transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Serial endpoint, if configured.
    pub serial: Option<SerialSettings>,
    /// TCP endpoint, if configured.
    pub tcp: Option<TcpSettings>,
}

impl Settings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(input: &str) -> CommResult<Self> {
        let settings: Settings = toml::from_str(input)
            .map_err(|e| CommError::Configuration(format!("invalid settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> CommResult<Self> {
        let input = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CommError::Configuration(format!(
                "cannot read settings file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml_str(&input)
    }

    /// Validate all configured endpoints.
    pub fn validate(&self) -> CommResult<()> {
        if let Some(serial) = &self.serial {
            serial.validate()?;
        }
        if let Some(tcp) = &self.tcp {
            tcp.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_document() {
        let settings = Settings::from_toml_str(
            r#"
            [serial]
            port = "/dev/ttyUSB0"
            baud_rate = 115200
            timeout = "500ms"

            [tcp]
            host = "192.168.1.50"
            timeout = "2s"
            "#,
        )
        .unwrap();

        let serial = settings.serial.unwrap();
        assert_eq!(serial.port, "/dev/ttyUSB0");
        assert_eq!(serial.baud_rate, 115200);
        assert_eq!(serial.timeout, Duration::from_millis(500));
        assert_eq!(serial.terminator, "\n");

        let tcp = settings.tcp.unwrap();
        assert_eq!(tcp.port, Scpi::DEFAULT_PORT);
        assert_eq!(tcp.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Settings::from_toml_str("[serial]\nbaudrate = 9600\n").unwrap_err();
        assert!(matches!(err, CommError::Configuration(_)));
    }

    #[test]
    fn test_semantic_validation() {
        // Parses fine, but the port name is missing.
        let err = Settings::from_toml_str("[serial]\nbaud_rate = 9600\n").unwrap_err();
        assert!(err.to_string().contains("port name"));

        let err =
            Settings::from_toml_str("[tcp]\nhost = \"10.0.0.5\"\ntimeout = \"0s\"\n").unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[tcp]\nhost = \"10.0.0.5\"\nport = 5024\n").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.tcp.unwrap().port, 5024);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = Settings::load("/nonexistent/settings.toml").unwrap_err();
        assert!(matches!(err, CommError::Configuration(_)));
    }
}
