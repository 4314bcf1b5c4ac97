use std::io::{Read, Seek, SeekFrom};

use pcap_parser::Linktype;
use time::OffsetDateTime;

use super::error::PcapSourceError;
use super::layout;

/// Read the magic bytes and rewind the reader to the start.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use seaframe_core::source::pcap::reader::read_magic_and_rewind;
/// use std::io::Cursor;
///
/// let mut cursor = Cursor::new([0x0a, 0x0d, 0x0d, 0x0a, 0x01]);
/// assert_eq!(read_magic_and_rewind(&mut cursor).unwrap(), [0x0a, 0x0d, 0x0d, 0x0a]);
/// ```
pub fn read_magic_and_rewind<R: Read + Seek>(
    reader: &mut R,
) -> Result<[u8; layout::MAGIC_LEN], PcapSourceError> {
    let mut magic = [0u8; layout::MAGIC_LEN];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; layout::MAGIC_LEN]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

/// Link type of a PCAPNG interface, defaulting to Ethernet.
pub fn linktype_for_interface(linktypes: &[Linktype], if_id: u32) -> Linktype {
    linktypes
        .get(if_id as usize)
        .copied()
        .unwrap_or(Linktype::ETHERNET)
}

/// Capture time of a legacy PCAP record (seconds plus microseconds).
pub fn legacy_timestamp(ts_sec: u32, ts_usec: u32) -> Option<OffsetDateTime> {
    let micros = i128::from(ts_sec) * layout::MICROS_PER_SECOND + i128::from(ts_usec);
    micros_to_datetime(micros)
}

/// Capture time of a PCAPNG enhanced packet, assuming the default
/// microsecond resolution.
pub fn pcapng_timestamp(ts_high: u32, ts_low: u32) -> Option<OffsetDateTime> {
    let micros = (u64::from(ts_high) << 32) | u64::from(ts_low);
    micros_to_datetime(i128::from(micros))
}

fn micros_to_datetime(micros: i128) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(micros * layout::NANOS_PER_MICRO).ok()
}

#[cfg(test)]
mod tests {
    use super::{
        is_pcapng_magic, legacy_timestamp, linktype_for_interface, pcapng_timestamp,
        read_magic_and_rewind,
    };
    use crate::source::pcap::error::PcapSourceError;
    use crate::source::pcap::layout;
    use pcap_parser::Linktype;
    use std::io::{Cursor, Read};
    use time::macros::datetime;

    #[test]
    fn detect_pcapng_magic() {
        assert!(is_pcapng_magic(&layout::PCAPNG_MAGIC));
        assert!(!is_pcapng_magic(&[0xd4, 0xc3, 0xb2, 0xa1]));
    }

    #[test]
    fn read_magic_rewinds() {
        let mut cursor = Cursor::new([0x0a, 0x0d, 0x0d, 0x0a, 0x01]);
        let magic = read_magic_and_rewind(&mut cursor).unwrap();
        assert_eq!(magic, layout::PCAPNG_MAGIC);
        let mut buf = [0u8; 1];
        cursor.read_exact(&mut buf).unwrap();
        assert_eq!(buf[0], 0x0a);
    }

    #[test]
    fn read_magic_too_short() {
        let mut cursor = Cursor::new([0x0a, 0x0d, 0x0d]);
        let err = read_magic_and_rewind(&mut cursor).unwrap_err();
        assert!(matches!(err, PcapSourceError::Io(_)));
    }

    #[test]
    fn linktype_defaults_to_ethernet_when_missing() {
        let linktypes = [Linktype::RAW];
        assert_eq!(linktype_for_interface(&linktypes, 0), Linktype::RAW);
        assert_eq!(linktype_for_interface(&linktypes, 1), Linktype::ETHERNET);
    }

    #[test]
    fn timestamps_keep_microseconds() {
        assert_eq!(
            legacy_timestamp(1_289_614_380, 250_000),
            Some(datetime!(2010-11-13 02:13:00.25 UTC))
        );
        let micros: u64 = 1_289_614_380_250_000;
        assert_eq!(
            pcapng_timestamp((micros >> 32) as u32, micros as u32),
            Some(datetime!(2010-11-13 02:13:00.25 UTC))
        );
    }
}
