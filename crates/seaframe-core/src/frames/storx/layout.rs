pub const FRAME_ID_RANGE: std::ops::Range<usize> = 0..6;
pub const SERIAL_RANGE: std::ops::Range<usize> = 6..10;
pub const ANALOG_CHANNELS_RANGE: std::ops::Range<usize> = 10..24;
pub const INTERNAL_VOLTAGE_RANGE: std::ops::Range<usize> = 24..26;
pub const TERMINATOR_RANGE: std::ops::Range<usize> = 26..28;
pub const LOGGER_TIMESTAMP_RANGE: std::ops::Range<usize> = 28..35;

pub const FRAME_ID_LEN: usize = 6;
pub const SERIAL_LEN: usize = 4;
pub const ANALOG_CHANNEL_COUNT: usize = 7;
pub const TERMINATOR_LEN: usize = 2;

pub const FRAME_LEN: usize = LOGGER_TIMESTAMP_RANGE.end;

pub const FRAME_ID: &[u8; 6] = b"SATSTX";
