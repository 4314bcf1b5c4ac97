//! Timestamp encodings shared by the Satlantic frame formats.
//!
//! Two encodings appear on the wire:
//! - the logger timestamp appended by the STOR-X to every stored frame
//!   (`YYYYDDD` as 24 bits, then `HHMMSSmmm` as a 32-bit integer), in the
//!   logger's local offset;
//! - the ISUS sample date/time (`YYYYDDD` as i32, decimal hours as f64), in UTC.
//!
//! All helpers are stateless and take the offset explicitly.

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::frames::common::buffer::FrameBuffer;
use crate::frames::error::FrameError;

/// Width of the logger timestamp appended to STOR-X frames.
pub const LOGGER_TIMESTAMP_LEN: usize = 7;

/// Decode a 7-byte logger timestamp in the given UTC offset.
///
/// # Examples
/// ```
/// use seaframe_core::frames::logger_timestamp;
/// use time::UtcOffset;
///
/// let bytes = [0x1E, 0xAC, 0xCC, 0x09, 0x9D, 0x3E, 0x20];
/// let ts = logger_timestamp(&bytes, UtcOffset::UTC).unwrap();
/// assert_eq!(ts.ordinal(), 316);
/// assert_eq!((ts.hour(), ts.minute(), ts.second()), (16, 13, 0));
/// ```
///
/// # Errors
/// Returns `FrameError::InvalidTimestamp` when the packed fields do not form
/// a calendar date and time of day.
pub fn logger_timestamp(
    bytes: &[u8; LOGGER_TIMESTAMP_LEN],
    offset: UtcOffset,
) -> Result<OffsetDateTime, FrameError> {
    let mut buffer = FrameBuffer::new(bytes);
    let year_day = buffer.read_u24_be()?;
    let packed_time = buffer.read_i32_be()?;
    buffer.finish()?;

    let date = year_day_date(year_day as i64)?;
    if packed_time < 0 {
        return Err(FrameError::invalid_timestamp(format!(
            "negative time of day {packed_time}"
        )));
    }
    let packed_time = packed_time as u32;
    let hour = packed_time / 10_000_000;
    let minute = (packed_time / 100_000) % 100;
    let second = (packed_time / 1_000) % 100;
    let millisecond = packed_time % 1_000;
    let time = Time::from_hms_milli(hour as u8, minute as u8, second as u8, millisecond as u16)
        .map_err(|_| {
            FrameError::invalid_timestamp(format!("time of day {packed_time:09} is out of range"))
        })?;
    Ok(PrimitiveDateTime::new(date, time).assume_offset(offset))
}

/// Compose the UTC sample timestamp from a packed `YYYYDDD` date and a
/// decimal-hours time of day.
///
/// A rounded second count of 60 carries into the next minute.
///
/// # Examples
/// ```
/// use seaframe_core::frames::sample_date_time;
///
/// let ts = sample_date_time(2010316, 16.0 + 13.0 / 60.0).unwrap();
/// assert_eq!((ts.hour(), ts.minute(), ts.second()), (16, 13, 0));
/// ```
///
/// # Errors
/// Returns `FrameError::InvalidTimestamp` for an invalid date or a time of
/// day outside `[0, 24)` hours.
pub fn sample_date_time(packed_date: i32, decimal_hours: f64) -> Result<OffsetDateTime, FrameError> {
    let date = year_day_date(packed_date as i64)?;
    if !decimal_hours.is_finite() || !(0.0..24.0).contains(&decimal_hours) {
        return Err(FrameError::invalid_timestamp(format!(
            "decimal hours {decimal_hours} outside [0, 24)"
        )));
    }
    let (hour, minute, second) = split_decimal_hours(decimal_hours);
    let midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc();
    Ok(midnight + Duration::hours(hour) + Duration::minutes(minute) + Duration::seconds(second))
}

/// Split decimal hours into whole hours, whole minutes and rounded seconds.
///
/// The value is first rounded to ten decimal places, matching the precision
/// the instrument firmware documents, so that `16.2166666…` splits into
/// `(16, 13, 0)` rather than `(16, 12, 60)`. Minutes are truncated; seconds
/// are rounded and may therefore equal 60.
///
/// # Examples
/// ```
/// use seaframe_core::frames::split_decimal_hours;
///
/// assert_eq!(split_decimal_hours(16.0 + 13.0 / 60.0), (16, 13, 0));
/// assert_eq!(split_decimal_hours(1.5), (1, 30, 0));
/// ```
pub fn split_decimal_hours(decimal_hours: f64) -> (i64, i64, i64) {
    let rounded = (decimal_hours * 1e10).round() / 1e10;
    let whole_hour = rounded.trunc();
    let fraction = rounded - whole_hour;
    let minutes = (fraction * 60.0).trunc();
    let seconds_fraction = (fraction * 60.0) - minutes;
    let seconds = (seconds_fraction * 60.0).round();
    (whole_hour as i64, minutes as i64, seconds as i64)
}

fn year_day_date(packed: i64) -> Result<Date, FrameError> {
    let year = packed / 1000;
    let ordinal = packed % 1000;
    let year = i32::try_from(year)
        .map_err(|_| FrameError::invalid_timestamp(format!("year in {packed} out of range")))?;
    let ordinal = u16::try_from(ordinal)
        .map_err(|_| FrameError::invalid_timestamp(format!("day of year in {packed} invalid")))?;
    Date::from_ordinal_date(year, ordinal).map_err(|_| {
        FrameError::invalid_timestamp(format!("{packed} is not a valid YYYYDDD date"))
    })
}
