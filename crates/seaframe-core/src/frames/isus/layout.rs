pub const HEADER_RANGE: std::ops::Range<usize> = 0..10;
pub const FRAME_ID_RANGE: std::ops::Range<usize> = 0..6;
pub const SERIAL_RANGE: std::ops::Range<usize> = 6..10;
pub const SAMPLE_DATE_RANGE: std::ops::Range<usize> = 10..14;
pub const SAMPLE_TIME_RANGE: std::ops::Range<usize> = 14..22;

pub const NITRATE_OFFSET: usize = 22;
pub const LAMP_TIME_RANGE: std::ops::Range<usize> = 54..58;
pub const HUMIDITY_OFFSET: usize = 58;

pub const CHANNELS_RANGE: std::ops::Range<usize> = 90..602;
pub const CHECKSUM_OFFSET: usize = 602;
pub const LOGGER_TIMESTAMP_RANGE: std::ops::Range<usize> = 603..610;

pub const HEADER_LEN: usize = 10;
pub const FLOAT_LEN: usize = 4;
pub const CHANNEL_COUNT: usize = 256;
pub const CHANNEL_WIDTH: usize = 2;
pub const CHANNELS_LEN: usize = CHANNEL_COUNT * CHANNEL_WIDTH;

pub const FRAME_LEN: usize = LOGGER_TIMESTAMP_RANGE.end;

pub const LIGHT_FRAME_ID: &[u8; 6] = b"SATNLB";
pub const DARK_FRAME_ID: &[u8; 6] = b"SATNDB";
