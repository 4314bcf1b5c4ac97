use time::UtcOffset;

use super::{ChannelBuilder, Sample};
use crate::calibration::CalibrationCatalog;
use crate::frames::FrameError;
use crate::frames::isus::IsusFrame;

/// Catalog keys of spectrometer wavelength variables.
pub const WAVELENGTH_PREFIX: &str = "UV_";

/// Published channel name and catalog key of each calibrated ISUS field,
/// in publish order. `lampTime` is published raw after `lampTemperature`.
pub const ISUS_CHANNELS: [(&str, &str); 16] = [
    ("nitrogenConcentration", "NITRATE"),
    ("auxConcentration1", "AUX1"),
    ("auxConcentration2", "AUX2"),
    ("auxConcentration3", "AUX3"),
    ("rmsError", "RMSe"),
    ("insideTemperature", "T_INT"),
    ("spectrometerTemperature", "T_SPEC"),
    ("lampTemperature", "T_LAMP"),
    ("humidity", "HUMIDITY"),
    ("lampVoltage12", "VOLT_12"),
    ("internalPowerVoltage5", "VOLT_5"),
    ("mainPowerVoltage", "VOLT_MAIN"),
    ("referenceAverage", "REF_AVG"),
    ("referenceVariance", "REF_STD"),
    ("seaWaterDarkCounts", "SW_DARK"),
    ("spectrometerAverage", "SPEC_AVG"),
];

const LAMP_TIME_CHANNEL: &str = "lampTime";
const LAMP_TIME_UNITS: &str = "s";
const LAMP_TIME_POSITION: usize = 8;

/// Assemble an ISUS light or dark frame.
///
/// Wavelength channels are the catalog variables starting with `UV_`, in
/// sorted key order, bound to spectrometer channels 1, 2, 3, ...
pub fn assemble_isus(
    frame: &IsusFrame,
    catalog: &CalibrationCatalog,
    is_immersed: bool,
    logger_offset: UtcOffset,
) -> Result<Sample, FrameError> {
    let timestamp = frame.logger_time(logger_offset)?;
    let sample_time = frame.sample_date_time()?;

    let raw_fields = [
        frame.nitrate,
        frame.aux1,
        frame.aux2,
        frame.aux3,
        frame.rms_error,
        frame.inside_temperature,
        frame.spectrometer_temperature,
        frame.lamp_temperature,
        frame.humidity,
        frame.lamp_voltage_12,
        frame.internal_power_voltage_5,
        frame.main_power_voltage,
        frame.reference_average,
        frame.reference_variance,
        frame.sea_water_dark_counts,
        frame.spectrometer_average,
    ];

    let mut builder = ChannelBuilder::new(catalog, is_immersed);
    for (position, ((name, variable), raw)) in ISUS_CHANNELS.iter().zip(raw_fields).enumerate() {
        if position == LAMP_TIME_POSITION {
            builder.raw(LAMP_TIME_CHANNEL, f64::from(frame.lamp_time), LAMP_TIME_UNITS);
        }
        builder.calibrated(name, variable, f64::from(raw));
    }

    let wavelengths = catalog
        .variable_names()
        .into_iter()
        .filter(|name| name.starts_with(WAVELENGTH_PREFIX));
    for (index, name) in wavelengths.enumerate() {
        let ordinal = index + 1;
        match frame.channel_counts(ordinal) {
            Some(counts) => builder.calibrated(name, name, f64::from(counts)),
            None => builder.skip(name, format!("no spectrometer channel {ordinal}")),
        }
    }

    let (channels, skipped) = builder.finish();
    Ok(Sample {
        frame_id: frame.frame_id().to_string(),
        serial_number: Some(frame.serial_number().to_string()),
        timestamp,
        sample_time: Some(sample_time),
        channels,
        skipped,
        text: None,
    })
}
