//! Instrument frame decoding modules.
//!
//! Each wire format follows a layered structure:
//! - `layout`: byte offsets, widths and frame lengths (source of truth)
//! - `parser`: decoding into a typed record through a [`FrameBuffer`]
//! - `error`: the shared [`FrameError`] taxonomy
//!
//! Decoders are pure functions over a borrowed byte slice. They never pad a
//! short frame and never return a partially decoded record: a frame either
//! decodes completely or is rejected with a typed error. Sources and the
//! pipeline layer handle file access and aggregation.

pub mod adam;
pub mod common;
pub mod ctd;
pub mod error;
pub mod isus;
pub mod logfile;
pub mod storx;

pub use common::buffer::FrameBuffer;
pub use common::time::{logger_timestamp, sample_date_time, split_decimal_hours};
pub use error::FrameError;
