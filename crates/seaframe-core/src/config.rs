//! Instrument configuration.
//!
//! A JSON document describing the deployment: the logger's local UTC
//! offset, the sensors attached to the logger (serial number, immersion,
//! calibration file locations) and the ADAM digitizer.
//!
//! # Examples
//! ```
//! use seaframe_core::config::InstrumentConfig;
//!
//! let config = InstrumentConfig::from_json(r#"{
//!     "sensors": [
//!         { "serial_number": "0265", "is_immersed": true,
//!           "calibration_urls": ["cal/SATNLB0265.cal", "cal/SATNDB0265.cal"] }
//!     ]
//! }"#).unwrap();
//! let sensor = config.sensor("0265").unwrap();
//! assert_eq!(sensor.calibration_for("NDB"), Some("cal/SATNDB0265.cal"));
//! assert_eq!(config.logger_offset().unwrap().whole_hours(), -10);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::UtcOffset;

use crate::calibration::CalibrationLocation;

/// Offset of the deployed STOR-X loggers (Hawaii-Aleutian standard time).
pub const DEFAULT_LOGGER_UTC_OFFSET_HOURS: i8 = -10;
pub const MAX_OFFSET_HOURS: i8 = 23;
pub const DEFAULT_ADAM_NAME: &str = "ADAM-6017";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentConfig {
    #[serde(default = "default_logger_offset")]
    pub logger_utc_offset_hours: i8,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adam: Option<AdamConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_immersed: bool,
    #[serde(default)]
    pub calibration_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdamConfig {
    #[serde(default = "default_adam_name")]
    pub name: String,
    /// Only datagrams to or from this UDP port are decoded, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logger UTC offset {hours} h is outside -{max}..={max}", max = MAX_OFFSET_HOURS)]
    InvalidOffset { hours: i8 },
    #[error("sensor serial number {serial_number} is configured more than once")]
    DuplicateSensor { serial_number: String },
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            logger_utc_offset_hours: DEFAULT_LOGGER_UTC_OFFSET_HOURS,
            sensors: Vec::new(),
            adam: None,
        }
    }
}

impl InstrumentConfig {
    /// Read a configuration file. Relative calibration paths are resolved
    /// against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: InstrumentConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger_offset()?;
        let mut seen = HashSet::new();
        for sensor in &self.sensors {
            if !seen.insert(sensor.serial_number.as_str()) {
                return Err(ConfigError::DuplicateSensor {
                    serial_number: sensor.serial_number.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn logger_offset(&self) -> Result<UtcOffset, ConfigError> {
        let hours = self.logger_utc_offset_hours;
        if !(-MAX_OFFSET_HOURS..=MAX_OFFSET_HOURS).contains(&hours) {
            return Err(ConfigError::InvalidOffset { hours });
        }
        UtcOffset::from_hms(hours, 0, 0).map_err(|_| ConfigError::InvalidOffset { hours })
    }

    pub fn sensor(&self, serial_number: &str) -> Option<&SensorConfig> {
        self.sensors
            .iter()
            .find(|sensor| sensor.serial_number == serial_number)
    }

    pub fn adam(&self) -> AdamConfig {
        self.adam.clone().unwrap_or_default()
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        for sensor in &mut self.sensors {
            for location in &mut sensor.calibration_urls {
                if let CalibrationLocation::Path(path) = CalibrationLocation::resolve(location) {
                    if path.is_relative() {
                        *location = base.join(path).to_string_lossy().into_owned();
                    }
                }
            }
        }
    }
}

impl SensorConfig {
    /// First calibration location whose text contains the frame type code,
    /// e.g. `NLB` selects `SATNLB0265.cal`.
    pub fn calibration_for(&self, type_code: &str) -> Option<&str> {
        self.calibration_urls
            .iter()
            .map(String::as_str)
            .find(|location| location.contains(type_code))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.serial_number)
    }
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            name: default_adam_name(),
            port: None,
        }
    }
}

fn default_logger_offset() -> i8 {
    DEFAULT_LOGGER_UTC_OFFSET_HOURS
}

fn default_adam_name() -> String {
    DEFAULT_ADAM_NAME.to_string()
}
