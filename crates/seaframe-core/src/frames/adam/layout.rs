pub const HEADER_RANGE: std::ops::Range<usize> = 0..22;
pub const READINGS_RANGE: std::ops::Range<usize> = 22..40;
pub const MAXIMA_RANGE: std::ops::Range<usize> = 40..58;
pub const MINIMA_RANGE: std::ops::Range<usize> = 58..76;

pub const HEADER_LEN: usize = 22;
/// Channels 0 through 7 followed by their average.
pub const READING_COUNT: usize = 9;

pub const PACKET_LEN: usize = MINIMA_RANGE.end;

/// Full span of the ±10 V input range, in volts.
pub const VOLTAGE_SENSE_RANGE: f64 = 20.0;
pub const VOLTAGE_FULL_SCALE: f64 = 65536.0;
