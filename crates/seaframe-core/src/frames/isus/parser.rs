use time::{OffsetDateTime, UtcOffset};

use super::layout;
use crate::frames::common::buffer::{FrameBuffer, ascii_lossy};
use crate::frames::common::time::{logger_timestamp, sample_date_time};
use crate::frames::error::FrameError;

/// One decoded ISUS nitrate frame, fields in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct IsusFrame {
    pub header: String,
    frame_id: String,
    serial_number: String,
    pub sample_date: i32,
    pub sample_time: f64,
    pub nitrate: f32,
    pub aux1: f32,
    pub aux2: f32,
    pub aux3: f32,
    pub rms_error: f32,
    pub inside_temperature: f32,
    pub spectrometer_temperature: f32,
    pub lamp_temperature: f32,
    pub lamp_time: i32,
    pub humidity: f32,
    pub lamp_voltage_12: f32,
    pub internal_power_voltage_5: f32,
    pub main_power_voltage: f32,
    pub reference_average: f32,
    pub reference_variance: f32,
    pub sea_water_dark_counts: f32,
    pub spectrometer_average: f32,
    channels: [u8; layout::CHANNELS_LEN],
    pub checksum: u8,
    pub timestamp: [u8; 7],
}

impl IsusFrame {
    /// Frame id, e.g. `SATNLB` or `SATNDB`.
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Instrument serial number, bytes 6..10 of the header.
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn is_dark(&self) -> bool {
        self.frame_id().as_bytes() == layout::DARK_FRAME_ID
    }

    /// Spectrometer counts for a 1-based channel number.
    ///
    /// Channel `n` lives at byte offset `(n * 2) - 2` of the channel block.
    /// Returns `None` outside `1..=256`.
    ///
    /// # Examples
    /// ```
    /// use seaframe_core::frames::isus::{layout, parse_isus_frame};
    ///
    /// let mut bytes = vec![0u8; layout::FRAME_LEN];
    /// bytes[..10].copy_from_slice(b"SATNLB0265");
    /// bytes[10..14].copy_from_slice(&2010316i32.to_be_bytes());
    /// bytes[layout::CHANNELS_RANGE.start + 2] = 0x01;
    /// bytes[layout::LOGGER_TIMESTAMP_RANGE][..3].copy_from_slice(&[0x1E, 0xAC, 0xCC]);
    /// let frame = parse_isus_frame(&bytes).unwrap();
    /// assert_eq!(frame.channel_counts(2), Some(0x0100));
    /// assert_eq!(frame.channel_counts(0), None);
    /// ```
    pub fn channel_counts(&self, channel: usize) -> Option<u16> {
        if !(1..=layout::CHANNEL_COUNT).contains(&channel) {
            return None;
        }
        let offset = (channel * layout::CHANNEL_WIDTH) - 2;
        Some(u16::from_be_bytes([
            self.channels[offset],
            self.channels[offset + 1],
        ]))
    }

    /// Sample timestamp reported by the instrument, in UTC.
    pub fn sample_date_time(&self) -> Result<OffsetDateTime, FrameError> {
        sample_date_time(self.sample_date, self.sample_time)
    }

    /// Timestamp appended by the logger, interpreted at `offset`.
    pub fn logger_time(&self, offset: UtcOffset) -> Result<OffsetDateTime, FrameError> {
        logger_timestamp(&self.timestamp, offset)
    }
}

/// Decode an ISUS nitrate frame of exactly [`layout::FRAME_LEN`] bytes.
///
/// The frame id is not validated here; classification happens when a log
/// file is split into frames.
pub fn parse_isus_frame(bytes: &[u8]) -> Result<IsusFrame, FrameError> {
    let mut buffer = FrameBuffer::with_declared_len(bytes, layout::FRAME_LEN)?;

    let header_bytes = buffer.take(layout::HEADER_LEN)?;
    let header_field = |range: std::ops::Range<usize>| {
        header_bytes.get(range).map(ascii_lossy).unwrap_or_default()
    };
    let header = ascii_lossy(header_bytes);
    let frame_id = header_field(layout::FRAME_ID_RANGE);
    let serial_number = header_field(layout::SERIAL_RANGE);
    let sample_date = buffer.read_i32_be()?;
    let sample_time = buffer.read_f64_be()?;
    let nitrate = buffer.read_f32_be()?;
    let aux1 = buffer.read_f32_be()?;
    let aux2 = buffer.read_f32_be()?;
    let aux3 = buffer.read_f32_be()?;
    let rms_error = buffer.read_f32_be()?;
    let inside_temperature = buffer.read_f32_be()?;
    let spectrometer_temperature = buffer.read_f32_be()?;
    let lamp_temperature = buffer.read_f32_be()?;
    let lamp_time = buffer.read_i32_be()?;
    let humidity = buffer.read_f32_be()?;
    let lamp_voltage_12 = buffer.read_f32_be()?;
    let internal_power_voltage_5 = buffer.read_f32_be()?;
    let main_power_voltage = buffer.read_f32_be()?;
    let reference_average = buffer.read_f32_be()?;
    let reference_variance = buffer.read_f32_be()?;
    let sea_water_dark_counts = buffer.read_f32_be()?;
    let spectrometer_average = buffer.read_f32_be()?;
    let channels = buffer.take_array::<{ layout::CHANNELS_LEN }>()?;
    let checksum = buffer.read_u8()?;
    let timestamp = buffer.take_array::<7>()?;
    buffer.finish()?;

    Ok(IsusFrame {
        header,
        frame_id,
        serial_number,
        sample_date,
        sample_time,
        nitrate,
        aux1,
        aux2,
        aux3,
        rms_error,
        inside_temperature,
        spectrometer_temperature,
        lamp_temperature,
        lamp_time,
        humidity,
        lamp_voltage_12,
        internal_power_voltage_5,
        main_power_voltage,
        reference_average,
        reference_variance,
        sea_water_dark_counts,
        spectrometer_average,
        channels,
        checksum,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_isus_frame;
    use crate::frames::error::FrameError;
    use crate::frames::isus::layout;
    use time::macros::datetime;

    fn float_at(bytes: &mut [u8], index: usize, value: f32) {
        let start = layout::NITRATE_OFFSET + index * layout::FLOAT_LEN;
        bytes[start..start + 4].copy_from_slice(&value.to_be_bytes());
    }

    fn sample_frame() -> Vec<u8> {
        let mut bytes = vec![0u8; layout::FRAME_LEN];
        bytes[layout::HEADER_RANGE].copy_from_slice(b"SATNLB0265");
        bytes[layout::SAMPLE_DATE_RANGE].copy_from_slice(&2010316i32.to_be_bytes());
        bytes[layout::SAMPLE_TIME_RANGE].copy_from_slice(&(16.0f64 + 13.0 / 60.0).to_be_bytes());
        for index in 0..8 {
            float_at(&mut bytes, index, index as f32 + 0.5);
        }
        bytes[layout::LAMP_TIME_RANGE].copy_from_slice(&123_456i32.to_be_bytes());
        let humidity = layout::HUMIDITY_OFFSET;
        bytes[humidity..humidity + 4].copy_from_slice(&42.25f32.to_be_bytes());
        let spectrometer_average = layout::HUMIDITY_OFFSET + 7 * layout::FLOAT_LEN;
        bytes[spectrometer_average..spectrometer_average + 4]
            .copy_from_slice(&1900.0f32.to_be_bytes());
        for channel in 0..layout::CHANNEL_COUNT {
            let offset = layout::CHANNELS_RANGE.start + channel * 2;
            bytes[offset..offset + 2].copy_from_slice(&(channel as u16 * 10).to_be_bytes());
        }
        bytes[layout::CHECKSUM_OFFSET] = 0xFF;
        bytes[layout::LOGGER_TIMESTAMP_RANGE]
            .copy_from_slice(&[0x1E, 0xAC, 0xCC, 0x09, 0x9D, 0x3E, 0x20]);
        bytes
    }

    #[test]
    fn parse_full_frame() {
        let frame = parse_isus_frame(&sample_frame()).unwrap();
        assert_eq!(frame.frame_id(), "SATNLB");
        assert_eq!(frame.serial_number(), "0265");
        assert!(!frame.is_dark());
        assert_eq!(frame.sample_date, 2010316);
        assert_eq!(frame.nitrate, 0.5);
        assert_eq!(frame.lamp_temperature, 7.5);
        assert_eq!(frame.lamp_time, 123_456);
        assert_eq!(frame.humidity, 42.25);
        assert_eq!(frame.spectrometer_average, 1900.0);
    }

    #[test]
    fn checksum_is_unsigned() {
        let frame = parse_isus_frame(&sample_frame()).unwrap();
        assert_eq!(frame.checksum, 255);
    }

    #[test]
    fn channel_addressing_is_one_based() {
        let frame = parse_isus_frame(&sample_frame()).unwrap();
        assert_eq!(frame.channel_counts(1), Some(0));
        assert_eq!(frame.channel_counts(2), Some(10));
        assert_eq!(frame.channel_counts(256), Some(2550));
        assert_eq!(frame.channel_counts(0), None);
        assert_eq!(frame.channel_counts(257), None);
    }

    #[test]
    fn timestamps_decode() {
        let frame = parse_isus_frame(&sample_frame()).unwrap();
        assert_eq!(
            frame.sample_date_time().unwrap(),
            datetime!(2010-11-12 16:13:00 UTC)
        );
        assert_eq!(
            frame.logger_time(time::macros::offset!(-10)).unwrap(),
            datetime!(2010-11-12 16:13:00 -10)
        );
    }

    #[test]
    fn short_frame_underflows() {
        let bytes = sample_frame();
        let err = parse_isus_frame(&bytes[..layout::FRAME_LEN - 1]).unwrap_err();
        assert_eq!(
            err,
            FrameError::Underflow {
                needed: layout::FRAME_LEN,
                actual: layout::FRAME_LEN - 1
            }
        );
        assert!(err.to_string().contains("frame too short"));
    }

    #[test]
    fn long_frame_is_rejected() {
        let mut bytes = sample_frame();
        bytes.push(0);
        let err = parse_isus_frame(&bytes).unwrap_err();
        assert!(matches!(err, FrameError::TrailingBytes { .. }));
    }

    #[test]
    fn dark_frames_are_flagged() {
        let mut bytes = sample_frame();
        bytes[..6].copy_from_slice(layout::DARK_FRAME_ID);
        let frame = parse_isus_frame(&bytes).unwrap();
        assert!(frame.is_dark());
    }

    #[test]
    fn serial_survives_non_ascii_header_bytes() {
        let mut bytes = sample_frame();
        bytes[3] = 0xFF;
        let frame = parse_isus_frame(&bytes).unwrap();
        assert_eq!(frame.serial_number(), "0265");
        assert_eq!(frame.frame_id(), "SAT\u{FFFD}LB");
        assert!(!frame.is_dark());
    }
}
