use super::layout;
use crate::frames::common::buffer::FrameBuffer;
use crate::frames::error::FrameError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdamPacket {
    pub header: [u8; layout::HEADER_LEN],
    /// Raw counts for channels 0..=7 then the average.
    pub readings: [u16; layout::READING_COUNT],
    pub maxima: [u16; layout::READING_COUNT],
    pub minima: [u16; layout::READING_COUNT],
}

impl AdamPacket {
    pub fn reading_volts(&self) -> [f64; layout::READING_COUNT] {
        self.readings.map(volts)
    }

    pub fn maxima_volts(&self) -> [f64; layout::READING_COUNT] {
        self.maxima.map(volts)
    }

    pub fn minima_volts(&self) -> [f64; layout::READING_COUNT] {
        self.minima.map(volts)
    }
}

/// Convert a raw count to volts: `20 * (raw / 65536) - 10`.
///
/// # Examples
/// ```
/// use seaframe_core::frames::adam::volts;
///
/// assert_eq!(volts(0), -10.0);
/// assert_eq!(volts(32768), 0.0);
/// ```
pub fn volts(raw: u16) -> f64 {
    layout::VOLTAGE_SENSE_RANGE * (f64::from(raw) / layout::VOLTAGE_FULL_SCALE)
        - layout::VOLTAGE_SENSE_RANGE / 2.0
}

/// Decode an ADAM-6017 UDP payload of exactly [`layout::PACKET_LEN`] bytes.
pub fn parse_adam_packet(bytes: &[u8]) -> Result<AdamPacket, FrameError> {
    let mut buffer = FrameBuffer::with_declared_len(bytes, layout::PACKET_LEN)?;

    let header = buffer.take_array::<{ layout::HEADER_LEN }>()?;
    let readings = read_block(&mut buffer)?;
    let maxima = read_block(&mut buffer)?;
    let minima = read_block(&mut buffer)?;
    buffer.finish()?;

    Ok(AdamPacket {
        header,
        readings,
        maxima,
        minima,
    })
}

fn read_block(buffer: &mut FrameBuffer<'_>) -> Result<[u16; layout::READING_COUNT], FrameError> {
    let mut block = [0u16; layout::READING_COUNT];
    for value in block.iter_mut() {
        *value = buffer.read_u16_be()?;
    }
    Ok(block)
}
