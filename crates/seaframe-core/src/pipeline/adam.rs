use std::path::Path;

use super::{PipelineError, RunReport};
use crate::Report;
use crate::assembly::{Sample, assemble_adam};
use crate::config::{AdamConfig, InstrumentConfig};
use crate::frames::adam::parse_adam_packet;
use crate::source::{
    CapturedPacket, PacketSource, PcapFileSource, SourceError, parse_udp_datagram,
};

/// Decode the ADAM digitizer packets recorded in a PCAP/PCAPNG capture.
pub fn process_adam_capture(path: &Path, config: &InstrumentConfig) -> Result<Report, PipelineError> {
    let source = PcapFileSource::open(path)?;
    process_adam_source(path, source, config)
}

/// Decode digitizer packets from any packet source. `path` names the input
/// in the report and provides its size.
///
/// Packets that are not UDP, or that do not match the configured port,
/// are skipped. UDP payloads that fail to decode are rejected, and so is a
/// record truncated at the end of the capture; the packets before it are
/// still reported.
pub fn process_adam_source<S: PacketSource>(
    path: &Path,
    mut source: S,
    config: &InstrumentConfig,
) -> Result<Report, PipelineError> {
    let adam = config.adam();
    let input_bytes = path
        .metadata()
        .map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    let mut run = RunReport::new(&path.display().to_string(), input_bytes);

    let mut index = 0usize;
    loop {
        let packet = match source.next_packet() {
            Ok(Some(packet)) => packet,
            Ok(None) => break,
            Err(SourceError::Truncated(reason)) => {
                run.frame_seen();
                run.reject(index, &adam.name, None, reason);
                break;
            }
            Err(err) => return Err(err.into()),
        };
        run.frame_seen();
        match process_packet(index, &packet, &adam) {
            Ok(Some(sample)) => run.sample(index, sample),
            Ok(None) => run.skip(),
            Err(reason) => run.reject(index, &adam.name, None, reason),
        }
        index += 1;
    }

    Ok(run.finish())
}

/// `Ok(None)` for packets that are not digitizer traffic.
fn process_packet(
    index: usize,
    packet: &CapturedPacket,
    adam: &AdamConfig,
) -> Result<Option<Sample>, String> {
    let Some(datagram) =
        parse_udp_datagram(packet.linktype, &packet.data).map_err(|err| err.to_string())?
    else {
        tracing::debug!(index, "not a UDP packet");
        return Ok(None);
    };

    if let Some(port) = adam.port {
        if datagram.source.port() != port && datagram.destination.port() != port {
            tracing::debug!(index, destination = %datagram.destination, "UDP packet for another port");
            return Ok(None);
        }
    }

    let decoded = parse_adam_packet(datagram.payload).map_err(|err| err.to_string())?;
    let timestamp = packet
        .timestamp
        .ok_or_else(|| "packet has no capture timestamp".to_string())?;
    Ok(Some(assemble_adam(&decoded, &adam.name, timestamp)))
}
