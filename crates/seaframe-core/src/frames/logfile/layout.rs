pub const FRAME_MARKER: &[u8; 3] = b"SAT";
pub const FRAME_ID_LEN: usize = 6;
pub const TYPE_CODE_RANGE: std::ops::Range<usize> = 3..6;
pub const SERIAL_RANGE: std::ops::Range<usize> = 6..10;

pub const HEADER_FRAME_ID: &[u8; 6] = b"SATHDR";
