//! SBE CTD frames embedded in STOR-X log files.
//!
//! Unlike the other formats the CTD frame has no fixed length: the logger
//! stores whatever text the CTD answered, framed by the usual header and
//! the trailing 7-byte logger timestamp. Only frames whose text looks like
//! a data line are treated as samples; command echoes and prompts are not.

pub mod layout;
pub mod parser;

pub use parser::{CtdFrame, parse_ctd_frame};
