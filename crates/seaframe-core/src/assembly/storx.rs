use time::UtcOffset;

use super::{ChannelBuilder, Sample};
use crate::calibration::CalibrationCatalog;
use crate::frames::FrameError;
use crate::frames::storx::StorXFrame;

/// Channel names and catalog keys of the seven analog inputs.
pub const STORX_ANALOG_CHANNELS: [(&str, &str); 7] = [
    ("analogChannelOne", "AUX_1"),
    ("analogChannelTwo", "AUX_2"),
    ("analogChannelThree", "AUX_3"),
    ("analogChannelFour", "AUX_4"),
    ("analogChannelFive", "AUX_5"),
    ("analogChannelSix", "AUX_6"),
    ("analogChannelSeven", "AUX_7"),
];

pub const STORX_VOLTAGE_CHANNEL: (&str, &str) = ("internalVoltage", "SV");

pub fn assemble_storx(
    frame: &StorXFrame,
    catalog: &CalibrationCatalog,
    is_immersed: bool,
    logger_offset: UtcOffset,
) -> Result<Sample, FrameError> {
    let timestamp = frame.logger_time(logger_offset)?;

    let mut builder = ChannelBuilder::new(catalog, is_immersed);
    for ((name, variable), raw) in STORX_ANALOG_CHANNELS.iter().zip(frame.analog_channels) {
        builder.calibrated(name, variable, f64::from(raw));
    }
    let (name, variable) = STORX_VOLTAGE_CHANNEL;
    builder.calibrated(name, variable, f64::from(frame.internal_voltage));

    let (channels, skipped) = builder.finish();
    Ok(Sample {
        frame_id: frame.frame_id.clone(),
        serial_number: Some(frame.serial_number.clone()),
        timestamp,
        sample_time: None,
        channels,
        skipped,
        text: None,
    })
}

#[cfg(test)]
mod tests {
    use super::assemble_storx;
    use crate::calibration::CalibrationCatalog;
    use crate::frames::storx::{layout, parse_storx_frame};
    use time::macros::{datetime, offset};

    const CAL: &str = "\
AUX 1 'V' 2 BU 1 POLYU
0.25 0.000382698
AUX 2 'V' 2 BU 1 POLYU
0.0 1.0
AUX 3 'V' 2 BU 1 POLYU
0.0 1.0
AUX 4 'V' 2 BU 1 POLYU
0.0 1.0
AUX 5 'V' 2 BU 1 POLYU
0.0 1.0
AUX 6 'V' 2 BU 1 POLYU
0.0 1.0
AUX 7 'mV' 2 BU 1 POLYU
0.0 1000.0
SV NONE 'V' 2 BU 0 COUNT
";

    fn frame_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; layout::FRAME_LEN];
        bytes[layout::FRAME_ID_RANGE].copy_from_slice(layout::FRAME_ID);
        bytes[layout::SERIAL_RANGE].copy_from_slice(b"0318");
        let analog = layout::ANALOG_CHANNELS_RANGE.start;
        bytes[analog..analog + 2].copy_from_slice(&32787u16.to_be_bytes());
        bytes[analog + 12..analog + 14].copy_from_slice(&3u16.to_be_bytes());
        bytes[layout::INTERNAL_VOLTAGE_RANGE].copy_from_slice(&1234u16.to_be_bytes());
        bytes[layout::TERMINATOR_RANGE].copy_from_slice(b"\r\n");
        bytes[layout::LOGGER_TIMESTAMP_RANGE]
            .copy_from_slice(&[0x1E, 0xAC, 0xCC, 0x09, 0x9D, 0x3E, 0x20]);
        bytes
    }

    #[test]
    fn calibrates_all_channels() {
        let catalog: CalibrationCatalog = CAL.parse().unwrap();
        let frame = parse_storx_frame(&frame_bytes()).unwrap();
        let sample = assemble_storx(&frame, &catalog, false, offset!(-10)).unwrap();

        assert_eq!(sample.frame_id, "SATSTX");
        assert_eq!(sample.serial_number.as_deref(), Some("0318"));
        assert_eq!(sample.timestamp, datetime!(2010-11-12 16:13:00 -10));
        assert_eq!(sample.channels.len(), 8);
        assert!(sample.skipped.is_empty());

        let one = sample.channel("analogChannelOne").unwrap();
        assert!((one.value - 12.797519326).abs() < 1e-9);
        assert_eq!(one.units, "V");
        let seven = sample.channel("analogChannelSeven").unwrap();
        assert_eq!(seven.value, 3000.0);
        assert_eq!(seven.units, "mV");
        assert_eq!(sample.channel("internalVoltage").unwrap().value, 1234.0);
    }

    #[test]
    fn partial_catalog_skips_missing_channels() {
        let catalog: CalibrationCatalog = "SV NONE 'V' 2 BU 0 COUNT\n".parse().unwrap();
        let frame = parse_storx_frame(&frame_bytes()).unwrap();
        let sample = assemble_storx(&frame, &catalog, false, offset!(-10)).unwrap();
        assert_eq!(sample.channels.len(), 1);
        assert_eq!(sample.skipped.len(), 7);
        assert_eq!(sample.skipped[6].name, "analogChannelSeven");
    }
}
