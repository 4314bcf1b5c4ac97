//! Advantech ADAM-6017 digitizer packets.
//!
//! The module streams one 76-byte UDP payload per cycle: a 22-byte header
//! followed by nine readings (analog channels 0 to 7 and their average),
//! then the nine maxima and the nine minima over the cycle. Readings are
//! 16-bit counts over the ±10 V range.

pub mod layout;
pub mod parser;

pub use parser::{AdamPacket, parse_adam_packet, volts};
