use time::{OffsetDateTime, UtcOffset};

use super::layout;
use crate::frames::common::buffer::{FrameBuffer, ascii_lossy};
use crate::frames::common::time::logger_timestamp;
use crate::frames::error::FrameError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtdFrame {
    pub frame_id: String,
    pub serial_number: String,
    /// Sample text with any leading command echo and trailing NULs removed.
    pub sample: String,
    pub timestamp: [u8; 7],
}

impl CtdFrame {
    /// True when the sample text is a CTD data line: a space, a digit,
    /// anything, a digit, then CR LF.
    pub fn is_data_sample(&self) -> bool {
        let Some(body) = self.sample.strip_suffix("\r\n") else {
            return false;
        };
        let Some(rest) = body.strip_prefix(' ') else {
            return false;
        };
        let bytes = rest.as_bytes();
        match (bytes.first(), bytes.last()) {
            (Some(first), Some(last)) => {
                bytes.len() >= 2 && first.is_ascii_digit() && last.is_ascii_digit()
            }
            _ => false,
        }
    }

    /// Comma-separated fields of a data line, trimmed.
    pub fn fields(&self) -> Vec<&str> {
        self.sample.trim().split(',').map(str::trim).collect()
    }

    pub fn logger_time(&self, offset: UtcOffset) -> Result<OffsetDateTime, FrameError> {
        logger_timestamp(&self.timestamp, offset)
    }
}

/// Decode a CTD frame of at least [`layout::MIN_LEN`] bytes.
///
/// The sample text runs from the byte after the separator up to the
/// logger timestamp in the last 7 bytes.
pub fn parse_ctd_frame(bytes: &[u8]) -> Result<CtdFrame, FrameError> {
    if bytes.len() < layout::MIN_LEN {
        return Err(FrameError::Underflow {
            needed: layout::MIN_LEN,
            actual: bytes.len(),
        });
    }
    let mut buffer = FrameBuffer::new(bytes);

    let frame_id = buffer.read_ascii(layout::FRAME_ID_LEN)?;
    let serial_number = buffer.read_ascii(layout::SERIAL_LEN)?;
    let _separator = buffer.read_u8()?;
    let sample_len = buffer.remaining() - layout::LOGGER_TIMESTAMP_LEN;
    let sample = clean_sample(&ascii_lossy(buffer.take(sample_len)?));
    let timestamp = buffer.take_array::<7>()?;
    buffer.finish()?;

    Ok(CtdFrame {
        frame_id,
        serial_number,
        sample,
        timestamp,
    })
}

fn clean_sample(raw: &str) -> String {
    let text = match raw.find('\0') {
        Some(end) => &raw[..end],
        None => raw,
    };
    match text.find(' ') {
        Some(start) if start > 0 => text[start..].to_string(),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_ctd_frame;
    use crate::frames::ctd::layout;
    use crate::frames::error::FrameError;
    use time::macros::{datetime, offset};

    fn frame_with_sample(sample: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(layout::FRAME_ID);
        bytes.extend_from_slice(b"1234");
        bytes.push(b'\t');
        bytes.extend_from_slice(sample);
        bytes.extend_from_slice(&[0x1E, 0xAC, 0xCC, 0x09, 0x9D, 0x3E, 0x20]);
        bytes
    }

    #[test]
    fn parse_data_sample() {
        let bytes = frame_with_sample(b" 24.1234, 4.56789, 12.345, 12 Nov 2010 16:12:58\r\n");
        let frame = parse_ctd_frame(&bytes).unwrap();
        assert_eq!(frame.frame_id, "SATSBE");
        assert_eq!(frame.serial_number, "1234");
        assert!(frame.is_data_sample());
        assert_eq!(frame.fields()[0], "24.1234");
        assert_eq!(frame.fields().len(), 4);
        assert_eq!(
            frame.logger_time(offset!(-10)).unwrap(),
            datetime!(2010-11-12 16:13:00 -10)
        );
    }

    #[test]
    fn command_echo_is_stripped() {
        let bytes = frame_with_sample(b"ts 24.1234, 4.56789\r\n");
        let frame = parse_ctd_frame(&bytes).unwrap();
        assert_eq!(frame.sample, " 24.1234, 4.56789\r\n");
        assert!(frame.is_data_sample());
    }

    #[test]
    fn prompts_are_not_samples() {
        let bytes = frame_with_sample(b"S>\r\n");
        let frame = parse_ctd_frame(&bytes).unwrap();
        assert!(!frame.is_data_sample());
    }

    #[test]
    fn trailing_nuls_are_removed() {
        let bytes = frame_with_sample(b" 1, 2\r\n\0\0\0");
        let frame = parse_ctd_frame(&bytes).unwrap();
        assert_eq!(frame.sample, " 1, 2\r\n");
    }

    #[test]
    fn short_frame_underflows() {
        let err = parse_ctd_frame(b"SATSBE1234\t").unwrap_err();
        assert_eq!(
            err,
            FrameError::Underflow {
                needed: layout::MIN_LEN,
                actual: 11
            }
        );
    }
}
