//! Offline packet sources.
//!
//! A source yields captured link-layer frames one at a time; the `udp`
//! module slices them down to UDP datagrams. All file I/O for captures
//! lives here.

pub mod pcap;
pub mod udp;

use pcap_parser::Linktype;
use thiserror::Error;
use time::OffsetDateTime;

pub use pcap::PcapFileSource;
pub use udp::{UdpDatagram, UdpError, parse_udp_datagram};

/// One captured link-layer frame.
#[derive(Debug, Clone)]
pub struct CapturedPacket {
    /// Capture time, when the record carries a representable one.
    pub timestamp: Option<OffsetDateTime>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<CapturedPacket>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
    /// The last record of the capture is incomplete.
    #[error("{0}")]
    Truncated(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
            err @ pcap::error::PcapSourceError::Truncated { .. } => {
                SourceError::Truncated(err.to_string())
            }
        }
    }
}
