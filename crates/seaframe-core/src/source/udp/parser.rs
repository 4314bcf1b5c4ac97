use std::net::{IpAddr, SocketAddr};

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::UdpError;
use super::layout;

/// UDP datagram borrowed from a captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpDatagram<'a> {
    pub source: SocketAddr,
    pub destination: SocketAddr,
    pub payload: &'a [u8],
}

/// Slice a captured frame down to its UDP datagram.
///
/// Returns `Ok(None)` for frames that are not UDP or whose link type is
/// neither Ethernet nor raw IP.
pub fn parse_udp_datagram(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<UdpDatagram<'_>>, UdpError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            SlicedPacket::from_ethernet(data).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        Linktype::RAW | Linktype::IPV4 | Linktype::IPV6 => {
            SlicedPacket::from_ip(data).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        _ => return Ok(None),
    };

    let net = sliced.net.ok_or(UdpError::MissingNetworkLayer)?;
    let Some(TransportSlice::Udp(udp)) = sliced.transport else {
        return Ok(None);
    };

    let (source_ip, destination_ip): (IpAddr, IpAddr) = match net {
        NetSlice::Ipv4(ref ipv4) => (
            ipv4.header().source_addr().into(),
            ipv4.header().destination_addr().into(),
        ),
        NetSlice::Ipv6(ref ipv6) => (
            ipv6.header().source_addr().into(),
            ipv6.header().destination_addr().into(),
        ),
    };

    let segment = net.ip_payload_ref().ok_or(UdpError::MissingIpPayload)?.payload;
    let payload = segment
        .get(layout::UDP_HEADER_LEN..)
        .ok_or(UdpError::TooShort {
            needed: layout::UDP_HEADER_LEN,
            actual: segment.len(),
        })?;

    Ok(Some(UdpDatagram {
        source: SocketAddr::new(source_ip, udp.source_port()),
        destination: SocketAddr::new(destination_ip, udp.destination_port()),
        payload,
    }))
}
