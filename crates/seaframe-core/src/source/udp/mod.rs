//! UDP slicing of captured Ethernet and raw-IP frames.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::UdpError;
pub use parser::{UdpDatagram, parse_udp_datagram};
