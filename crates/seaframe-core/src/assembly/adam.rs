use time::OffsetDateTime;

use super::{Channel, Sample};
use crate::frames::adam::{AdamPacket, layout};

/// Reading names in packet order: channels 0 to 7, then the average.
pub const ADAM_CHANNEL_NAMES: [&str; layout::READING_COUNT] = [
    "channelZero",
    "channelOne",
    "channelTwo",
    "channelThree",
    "channelFour",
    "channelFive",
    "channelSix",
    "channelSeven",
    "channelAverage",
];

const VOLTS: &str = "V";

/// Assemble a digitizer packet captured at `timestamp`.
///
/// Readings are published as volts; the digitizer has no calibration
/// catalog. Each reading is followed by its `Max` and `Min` companions.
///
/// # Examples
/// ```
/// use seaframe_core::assembly::assemble_adam;
/// use seaframe_core::frames::adam::{AdamPacket, layout};
/// use time::macros::datetime;
///
/// let packet = AdamPacket {
///     header: [0; layout::HEADER_LEN],
///     readings: [32768; 9],
///     maxima: [65535; 9],
///     minima: [0; 9],
/// };
/// let sample = assemble_adam(&packet, "ADAM-6017", datetime!(2012-03-01 00:00 UTC));
/// assert_eq!(sample.channels.len(), 27);
/// assert_eq!(sample.channel("channelZero").unwrap().value, 0.0);
/// assert_eq!(sample.channel("channelZeroMin").unwrap().value, -10.0);
/// ```
pub fn assemble_adam(packet: &AdamPacket, name: &str, timestamp: OffsetDateTime) -> Sample {
    let readings = packet.reading_volts();
    let maxima = packet.maxima_volts();
    let minima = packet.minima_volts();

    let mut channels = Vec::with_capacity(layout::READING_COUNT * 3);
    for (index, base) in ADAM_CHANNEL_NAMES.iter().enumerate() {
        channels.push(volts_channel(base.to_string(), readings[index]));
        channels.push(volts_channel(format!("{base}Max"), maxima[index]));
        channels.push(volts_channel(format!("{base}Min"), minima[index]));
    }

    Sample {
        frame_id: name.to_string(),
        serial_number: None,
        timestamp,
        sample_time: None,
        channels,
        skipped: Vec::new(),
        text: None,
    }
}

fn volts_channel(name: String, value: f64) -> Channel {
    Channel {
        name,
        value,
        units: VOLTS.to_string(),
    }
}
