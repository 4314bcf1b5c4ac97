pub const FRAME_ID_RANGE: std::ops::Range<usize> = 0..6;
pub const SERIAL_RANGE: std::ops::Range<usize> = 6..10;
pub const SEPARATOR_OFFSET: usize = 10;
pub const SAMPLE_OFFSET: usize = 11;

pub const FRAME_ID_LEN: usize = 6;
pub const SERIAL_LEN: usize = 4;
pub const LOGGER_TIMESTAMP_LEN: usize = 7;

pub const MIN_LEN: usize = SAMPLE_OFFSET + LOGGER_TIMESTAMP_LEN;

pub const FRAME_ID: &[u8; 6] = b"SATSBE";
