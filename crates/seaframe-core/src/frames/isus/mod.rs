//! ISUS nitrate frame decoding.
//!
//! An ISUS V3 frame as stored by a STOR-X logger is 610 bytes: a 10-byte
//! header (`SATNLB` or `SATNDB` plus the 4-character serial number), the
//! sample date and time, seventeen measurement fields, 256 spectrometer
//! channel counts, a checksum byte and the 7-byte logger timestamp.
//!
//! Channel counts are addressed by 1-based channel number so that
//! calibration keys (`UV_…`) map onto channel ordinals starting at 1.
//!
//! Version française (résumé):
//! Décodage des trames nitrate ISUS (610 octets). Les positions sont dans
//! `layout`; les canaux du spectromètre sont numérotés à partir de 1.

pub mod layout;
pub mod parser;

pub use parser::{IsusFrame, parse_isus_frame};
