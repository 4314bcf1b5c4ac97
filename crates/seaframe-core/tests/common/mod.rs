#![allow(dead_code)]

use std::fs;
use std::path::Path;

const ETHERTYPE_IPV4: u16 = 0x0800;
const UDP_PROTO: u8 = 17;

/// Logger timestamp bytes for 2010-11-12 16:13:00.000 local time.
pub const LOGGER_TIMESTAMP: [u8; 7] = [0x1E, 0xAC, 0xCC, 0x09, 0x9D, 0x3E, 0x20];

pub const ADAM_PACKET_LEN: usize = 76;

pub fn storx_frame(serial: &[u8; 4], analog: [u16; 7], voltage: u16) -> Vec<u8> {
    let mut frame = Vec::with_capacity(35);
    frame.extend_from_slice(b"SATSTX");
    frame.extend_from_slice(serial);
    for value in analog {
        frame.extend_from_slice(&value.to_be_bytes());
    }
    frame.extend_from_slice(&voltage.to_be_bytes());
    frame.extend_from_slice(b"\r\n");
    frame.extend_from_slice(&LOGGER_TIMESTAMP);
    frame
}

pub fn isus_frame(id: &[u8; 6], serial: &[u8; 4], nitrate: f32, channels: &[u16]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(610);
    frame.extend_from_slice(id);
    frame.extend_from_slice(serial);
    frame.extend_from_slice(&2010316i32.to_be_bytes());
    frame.extend_from_slice(&(16.0 + 13.0 / 60.0f64).to_be_bytes());
    frame.extend_from_slice(&nitrate.to_be_bytes());
    frame.extend_from_slice(&[0u8; 7 * 4]);
    frame.extend_from_slice(&120i32.to_be_bytes());
    frame.extend_from_slice(&[0u8; 8 * 4]);
    let mut counts = [0u16; 256];
    counts[..channels.len()].copy_from_slice(channels);
    for value in counts {
        frame.extend_from_slice(&value.to_be_bytes());
    }
    frame.push(0xF3);
    frame.extend_from_slice(&LOGGER_TIMESTAMP);
    frame
}

pub fn ctd_frame(serial: &[u8; 4], sample: &[u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(b"SATSBE");
    frame.extend_from_slice(serial);
    frame.push(b'\t');
    frame.extend_from_slice(sample);
    frame.extend_from_slice(&LOGGER_TIMESTAMP);
    frame
}

pub fn adam_payload(readings: [u16; 9]) -> Vec<u8> {
    let mut payload = vec![0u8; 22];
    for value in readings {
        payload.extend_from_slice(&value.to_be_bytes());
    }
    for _ in 0..9 {
        payload.extend_from_slice(&u16::MAX.to_be_bytes());
    }
    for _ in 0..9 {
        payload.extend_from_slice(&0u16.to_be_bytes());
    }
    payload
}

pub fn build_ipv4_udp_packet(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut packet = Vec::new();
    packet.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    packet.extend_from_slice(&[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]);
    packet.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

    let total_len = 20u16 + 8u16 + (payload.len() as u16);
    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&total_len.to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = UDP_PROTO;
    ip_header[12..16].copy_from_slice(&src_ip);
    ip_header[16..20].copy_from_slice(&dst_ip);
    let checksum = ipv4_checksum(&ip_header);
    ip_header[10..12].copy_from_slice(&checksum.to_be_bytes());
    packet.extend_from_slice(&ip_header);

    let udp_len = 8u16 + (payload.len() as u16);
    packet.extend_from_slice(&src_port.to_be_bytes());
    packet.extend_from_slice(&dst_port.to_be_bytes());
    packet.extend_from_slice(&udp_len.to_be_bytes());
    packet.extend_from_slice(&0u16.to_be_bytes());

    packet.extend_from_slice(payload);
    packet
}

fn ipv4_checksum(header: &[u8; 20]) -> u16 {
    let mut sum = 0u32;
    for chunk in header.chunks(2) {
        sum = sum.wrapping_add(u16::from_be_bytes([chunk[0], chunk[1]]) as u32);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// Write a single-interface Ethernet PCAPNG capture; timestamps are
/// microseconds since the epoch.
pub fn write_pcapng(path: &Path, packets: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body()));
    for (ts_us, data) in packets {
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(*ts_us, data)));
    }
    fs::write(path, output).unwrap();
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    body
}

fn enhanced_packet_body(ts_us: u64, data: &[u8]) -> Vec<u8> {
    let ts_high = ((ts_us >> 32) & 0xFFFF_FFFF) as u32;
    let ts_low = (ts_us & 0xFFFF_FFFF) as u32;
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}

/// Legacy little-endian PCAP bytes for Ethernet frames; timestamps are
/// microseconds since the epoch.
pub fn legacy_pcap(packets: &[(u64, Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0xa1b2c3d4u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&65535u32.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    for (ts_us, data) in packets {
        out.extend_from_slice(&((ts_us / 1_000_000) as u32).to_le_bytes());
        out.extend_from_slice(&((ts_us % 1_000_000) as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
    }
    out
}

/// PCAP record header announcing `claimed` bytes, followed by only `present`.
pub fn cut_pcap_record(ts_sec: u32, claimed: u32, present: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&ts_sec.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&claimed.to_le_bytes());
    out.extend_from_slice(&claimed.to_le_bytes());
    out.extend(std::iter::repeat_n(0xAAu8, present));
    out
}
