use time::UtcOffset;

use super::{Channel, Sample, SkippedChannel};
use crate::frames::FrameError;
use crate::frames::ctd::CtdFrame;

/// Name prefix of CTD fields; the first comma-separated value is `field1`.
pub const CTD_FIELD_PREFIX: &str = "field";

/// Assemble a CTD data line. No engineering conversion is applied: each
/// comma-separated value becomes an ordinal channel with empty units, and
/// tokens that are not finite numbers are skipped. The trimmed line is kept
/// as text.
pub fn assemble_ctd(frame: &CtdFrame, logger_offset: UtcOffset) -> Result<Sample, FrameError> {
    let mut channels = Vec::new();
    let mut skipped = Vec::new();
    for (ordinal, token) in frame.fields().into_iter().enumerate() {
        let name = format!("{CTD_FIELD_PREFIX}{}", ordinal + 1);
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => channels.push(Channel {
                name,
                value,
                units: String::new(),
            }),
            _ => skipped.push(SkippedChannel {
                name,
                reason: format!("non-numeric field '{token}'"),
            }),
        }
    }

    Ok(Sample {
        frame_id: frame.frame_id.clone(),
        serial_number: Some(frame.serial_number.clone()),
        timestamp: frame.logger_time(logger_offset)?,
        sample_time: None,
        channels,
        skipped,
        text: Some(frame.sample.trim().to_string()),
    })
}
