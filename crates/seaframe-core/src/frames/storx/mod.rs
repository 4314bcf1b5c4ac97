//! STOR-X logger frame decoding.
//!
//! The logger writes one 35-byte `SATSTX` frame per sampling cycle with its
//! own seven auxiliary analog inputs and its supply voltage, all as raw
//! 16-bit counts. Calibration to engineering units happens downstream.

pub mod layout;
pub mod parser;

pub use parser::{StorXFrame, parse_storx_frame};
