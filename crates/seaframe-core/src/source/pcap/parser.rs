use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};

use crate::source::{CapturedPacket, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    is_pcapng_magic, legacy_timestamp, linktype_for_interface, pcapng_timestamp,
    read_magic_and_rewind,
};

/// Packet source backed by a PCAP or PCAPNG file.
///
/// A record cut short at the end of the file is reported once as
/// [`SourceError::Truncated`]; the source is exhausted afterwards.
pub struct PcapFileSource {
    inner: PcapReader,
    exhausted: bool,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = create_reader(file)?;
        Ok(Self {
            inner,
            exhausted: false,
        })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<CapturedPacket>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }
        let next = next_packet(&mut self.inner).map_err(SourceError::from);
        if matches!(next, Ok(None) | Err(SourceError::Truncated(_))) {
            self.exhausted = true;
        }
        next
    }
}

fn create_reader(mut file: File) -> Result<PcapReader, PcapSourceError> {
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcapng reader init", e))?;
        Ok(PcapReader::Ng {
            reader,
            linktypes: Vec::new(),
        })
    } else {
        let reader = LegacyPcapReader::new(layout::READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcap reader init", e))?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: None,
        })
    }
}

fn next_packet(reader: &mut PcapReader) -> Result<Option<CapturedPacket>, PcapSourceError> {
    loop {
        match reader {
            PcapReader::Legacy { reader, linktype } => match reader.next() {
                Ok((offset, block)) => {
                    let packet = match block {
                        PcapBlockOwned::LegacyHeader(header) => {
                            *linktype = Some(header.network);
                            None
                        }
                        PcapBlockOwned::Legacy(record) => Some(CapturedPacket {
                            timestamp: legacy_timestamp(record.ts_sec, record.ts_usec),
                            linktype: linktype.unwrap_or(Linktype::ETHERNET),
                            data: record.data.to_vec(),
                        }),
                        _ => None,
                    };
                    reader.consume(offset);
                    if packet.is_some() {
                        return Ok(packet);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::UnexpectedEof) => {
                    return Err(PcapSourceError::Truncated { context: "pcap record" });
                }
                Err(PcapError::Incomplete(_)) => {
                    reader
                        .refill()
                        .map_err(|e| PcapSourceError::pcap("pcap reader refill", e))?;
                }
                Err(e) => return Err(PcapSourceError::pcap("pcap reader next", e)),
            },
            PcapReader::Ng { reader, linktypes } => match reader.next() {
                Ok((offset, block)) => {
                    let packet = match block {
                        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                            linktypes.clear();
                            None
                        }
                        PcapBlockOwned::NG(Block::InterfaceDescription(interface)) => {
                            linktypes.push(interface.linktype);
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(record)) => Some(CapturedPacket {
                            timestamp: pcapng_timestamp(record.ts_high, record.ts_low),
                            linktype: linktype_for_interface(linktypes, record.if_id),
                            data: record.data.to_vec(),
                        }),
                        _ => None,
                    };
                    reader.consume(offset);
                    if packet.is_some() {
                        return Ok(packet);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::UnexpectedEof) => {
                    return Err(PcapSourceError::Truncated { context: "pcapng block" });
                }
                Err(PcapError::Incomplete(_)) => {
                    reader
                        .refill()
                        .map_err(|e| PcapSourceError::pcap("pcapng reader refill", e))?;
                }
                Err(e) => return Err(PcapSourceError::pcap("pcapng reader next", e)),
            },
        }
    }
}
