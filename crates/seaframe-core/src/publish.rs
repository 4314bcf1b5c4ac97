//! Hand-off to the downstream archive.
//!
//! The archive is an opaque sink: it accepts a channel name, a calibrated
//! value, a units string and a POSIX timestamp. Publishing never retries; a
//! failing sink stops [`publish_sample`] and the caller decides what to do.

use std::io::Write;

use crate::assembly::Sample;

/// Downstream sink for calibrated channels.
pub trait Publisher {
    type Error;

    fn publish(
        &mut self,
        channel: &str,
        value: f64,
        units: &str,
        epoch_seconds: f64,
    ) -> Result<(), Self::Error>;
}

/// Publish every channel of `sample` in order, stamped with the sample's
/// publish timestamp. Returns the number of channels published.
///
/// # Examples
/// ```
/// use seaframe_core::publish::{Publisher, publish_sample};
/// # use seaframe_core::assembly::{Channel, Sample};
/// # use time::macros::datetime;
///
/// #[derive(Default)]
/// struct Recorder(Vec<(String, f64)>);
///
/// impl Publisher for Recorder {
///     type Error = std::convert::Infallible;
///
///     fn publish(&mut self, channel: &str, value: f64, _: &str, _: f64) -> Result<(), Self::Error> {
///         self.0.push((channel.to_string(), value));
///         Ok(())
///     }
/// }
///
/// # let sample = Sample {
/// #     frame_id: "SATSTX".to_string(),
/// #     serial_number: Some("0318".to_string()),
/// #     timestamp: datetime!(2010-11-12 16:13:00 -10),
/// #     sample_time: None,
/// #     channels: vec![Channel { name: "internalVoltage".to_string(), value: 12.5, units: "V".to_string() }],
/// #     skipped: Vec::new(),
/// #     text: None,
/// # };
/// let mut recorder = Recorder::default();
/// assert_eq!(publish_sample(&mut recorder, &sample).unwrap(), 1);
/// assert_eq!(recorder.0, vec![("internalVoltage".to_string(), 12.5)]);
/// ```
pub fn publish_sample<P: Publisher>(publisher: &mut P, sample: &Sample) -> Result<usize, P::Error> {
    let epoch_seconds = sample.epoch_seconds();
    for channel in &sample.channels {
        publisher.publish(&channel.name, channel.value, &channel.units, epoch_seconds)?;
    }
    Ok(sample.channels.len())
}

/// Writes one tab-separated line per channel:
/// `epoch_seconds  channel  value  units`.
#[derive(Debug)]
pub struct LinePublisher<W: Write> {
    writer: W,
}

impl<W: Write> LinePublisher<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Publisher for LinePublisher<W> {
    type Error = std::io::Error;

    fn publish(
        &mut self,
        channel: &str,
        value: f64,
        units: &str,
        epoch_seconds: f64,
    ) -> Result<(), Self::Error> {
        writeln!(self.writer, "{epoch_seconds:.3}\t{channel}\t{value}\t{units}")
    }
}
