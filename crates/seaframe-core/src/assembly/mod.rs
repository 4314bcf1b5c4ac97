//! Sample assembly: decoded frames plus calibration become named channels.
//!
//! Assemblers combine one decoded record with the instrument's
//! [`CalibrationCatalog`] and produce a [`Sample`]: an ordered list of
//! `(name, value, units)` channels and the timestamps to publish with.
//! A channel whose calibration fails is left out and recorded in
//! [`Sample::skipped`]; the remaining channels are still produced.
//!
//! Frame-level failures (an invalid logger timestamp, for instance) reject
//! the whole sample and surface as [`FrameError`].
//!
//! [`FrameError`]: crate::frames::FrameError

use time::OffsetDateTime;

use crate::calibration::{CalibrationCatalog, CalibrationEngine};

mod adam;
mod ctd;
mod isus;
mod storx;

pub use adam::{ADAM_CHANNEL_NAMES, assemble_adam};
pub use ctd::{CTD_FIELD_PREFIX, assemble_ctd};
pub use isus::{ISUS_CHANNELS, WAVELENGTH_PREFIX, assemble_isus};
pub use storx::{STORX_ANALOG_CHANNELS, STORX_VOLTAGE_CHANNEL, assemble_storx};

/// One published value.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub value: f64,
    pub units: String,
}

/// A channel left out of a sample and the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChannel {
    pub name: String,
    pub reason: String,
}

/// Calibrated channels of one frame, ready for a publisher.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Frame id (`SATNLB`, `SATSTX`, ...) or the digitizer name.
    pub frame_id: String,
    pub serial_number: Option<String>,
    /// Time the sample is published with: the logger timestamp for log
    /// file frames, the capture timestamp for digitizer packets.
    pub timestamp: OffsetDateTime,
    /// Sample time reported by the instrument itself (ISUS only).
    pub sample_time: Option<OffsetDateTime>,
    pub channels: Vec<Channel>,
    pub skipped: Vec<SkippedChannel>,
    /// Raw sample text for instruments without engineering conversion.
    pub text: Option<String>,
}

impl Sample {
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.name == name)
    }

    /// Publish timestamp as POSIX seconds with fractional part.
    pub fn epoch_seconds(&self) -> f64 {
        self.timestamp.unix_timestamp_nanos() as f64 / 1_000_000_000.0
    }
}

/// Accumulates channels for one sample, routing each raw value through the
/// catalog fit named by its variable key.
struct ChannelBuilder<'a> {
    engine: CalibrationEngine<'a>,
    is_immersed: bool,
    channels: Vec<Channel>,
    skipped: Vec<SkippedChannel>,
}

impl<'a> ChannelBuilder<'a> {
    fn new(catalog: &'a CalibrationCatalog, is_immersed: bool) -> Self {
        Self {
            engine: catalog.engine(),
            is_immersed,
            channels: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn calibrated(&mut self, name: &str, variable: &str, raw: f64) {
        match self.engine.apply(raw, self.is_immersed, variable) {
            Ok(value) => {
                let units = self
                    .engine
                    .catalog()
                    .get(variable)
                    .map(|entry| entry.units.clone())
                    .unwrap_or_default();
                self.raw(name, value, &units);
            }
            Err(err) => self.skip(name, err.to_string()),
        }
    }

    fn raw(&mut self, name: &str, value: f64, units: &str) {
        self.channels.push(Channel {
            name: name.to_string(),
            value,
            units: units.to_string(),
        });
    }

    fn skip(&mut self, name: &str, reason: String) {
        self.skipped.push(SkippedChannel {
            name: name.to_string(),
            reason,
        });
    }

    fn finish(self) -> (Vec<Channel>, Vec<SkippedChannel>) {
        (self.channels, self.skipped)
    }
}
