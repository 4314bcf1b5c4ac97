//! STOR-X log file splitting.
//!
//! A log file is the raw byte stream the logger recorded: a `SATHDR` file
//! header followed by frames from the logger itself and from the sensors
//! attached to it. Every frame starts with ASCII `SAT`; nothing else marks
//! its end, so a frame runs up to the next marker or to the end of input.
//!
//! The splitter only cuts and classifies. Decoding each frame is left to
//! the per-format parsers so that one damaged frame never hides the rest.

pub mod layout;
pub mod parser;

pub use parser::{FrameKind, LoggedFrame, split_log_file};
