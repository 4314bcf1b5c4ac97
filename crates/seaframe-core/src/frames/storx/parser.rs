use time::{OffsetDateTime, UtcOffset};

use super::layout;
use crate::frames::common::buffer::FrameBuffer;
use crate::frames::common::time::logger_timestamp;
use crate::frames::error::FrameError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorXFrame {
    pub frame_id: String,
    pub serial_number: String,
    /// Raw counts for analog inputs one through seven.
    pub analog_channels: [u16; layout::ANALOG_CHANNEL_COUNT],
    pub internal_voltage: u16,
    pub terminator: String,
    pub timestamp: [u8; 7],
}

impl StorXFrame {
    pub fn logger_time(&self, offset: UtcOffset) -> Result<OffsetDateTime, FrameError> {
        logger_timestamp(&self.timestamp, offset)
    }
}

/// Decode a STOR-X frame of exactly [`layout::FRAME_LEN`] bytes.
pub fn parse_storx_frame(bytes: &[u8]) -> Result<StorXFrame, FrameError> {
    let mut buffer = FrameBuffer::with_declared_len(bytes, layout::FRAME_LEN)?;

    let frame_id = buffer.read_ascii(layout::FRAME_ID_LEN)?;
    let serial_number = buffer.read_ascii(layout::SERIAL_LEN)?;
    let mut analog_channels = [0u16; layout::ANALOG_CHANNEL_COUNT];
    for channel in analog_channels.iter_mut() {
        *channel = buffer.read_u16_be()?;
    }
    let internal_voltage = buffer.read_u16_be()?;
    let terminator = buffer.read_ascii(layout::TERMINATOR_LEN)?;
    let timestamp = buffer.take_array::<7>()?;
    buffer.finish()?;

    Ok(StorXFrame {
        frame_id,
        serial_number,
        analog_channels,
        internal_voltage,
        terminator,
        timestamp,
    })
}
