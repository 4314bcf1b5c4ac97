//! PCAP/PCAPNG capture files.
//!
//! Replays recorded ADAM digitizer traffic: the file format is detected
//! from its magic bytes and every captured link-layer frame is emitted with
//! its capture timestamp and link type. Interpreting the frames is left to
//! the `udp` module and the pipeline.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
