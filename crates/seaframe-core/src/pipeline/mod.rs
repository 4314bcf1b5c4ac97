use std::path::PathBuf;

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::assembly::Sample;
use crate::config::ConfigError;
use crate::source::SourceError;
use crate::{
    ChannelRecord, DEFAULT_GENERATED_AT, FrameSummary, RejectedFrame, Report, SampleRecord,
    SkippedChannelRecord, make_stub_report,
};

mod adam;
mod catalogs;
mod logfile;

pub use adam::{process_adam_capture, process_adam_source};
pub use logfile::{process_log_bytes, process_log_file};

/// Failures that stop a whole run. Per-frame problems never surface here;
/// they become [`RejectedFrame`] entries in the report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Accumulates the outcome of every frame of a run into a report.
struct RunReport {
    report: Report,
    frames_total: u64,
    skipped: u64,
    first: Option<OffsetDateTime>,
    last: Option<OffsetDateTime>,
}

impl RunReport {
    fn new(input_path: &str, input_bytes: u64) -> Self {
        Self {
            report: make_stub_report(input_path, input_bytes),
            frames_total: 0,
            skipped: 0,
            first: None,
            last: None,
        }
    }

    fn frame_seen(&mut self) {
        self.frames_total += 1;
    }

    fn skip(&mut self) {
        self.skipped += 1;
    }

    fn sample(&mut self, index: usize, sample: Sample) {
        update_ts_bounds(&mut self.first, &mut self.last, sample.timestamp);
        self.report.samples.push(sample_record(index, sample));
    }

    fn reject(&mut self, index: usize, frame_type: &str, serial_number: Option<String>, reason: String) {
        tracing::warn!(index, frame_type, ?serial_number, %reason, "frame rejected");
        self.report.rejected.push(RejectedFrame {
            index: index as u64,
            frame_type: frame_type.to_string(),
            serial_number,
            reason,
        });
    }

    fn finish(mut self) -> Report {
        let time_start = self.first.map(format_timestamp);
        let time_end = self.last.map(format_timestamp);
        self.report.generated_at = time_end
            .clone()
            .or(time_start.clone())
            .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
        self.report.summary = Some(FrameSummary {
            frames_total: self.frames_total,
            samples: self.report.samples.len() as u64,
            skipped: self.skipped,
            rejected: self.report.rejected.len() as u64,
            time_start,
            time_end,
        });
        self.report
    }
}

fn sample_record(index: usize, sample: Sample) -> SampleRecord {
    SampleRecord {
        index: index as u64,
        frame_id: sample.frame_id,
        serial_number: sample.serial_number,
        timestamp: format_timestamp(sample.timestamp),
        sample_time: sample.sample_time.map(format_timestamp),
        channels: sample
            .channels
            .into_iter()
            .map(|channel| ChannelRecord {
                name: channel.name,
                value: channel.value,
                units: channel.units,
            })
            .collect(),
        skipped_channels: sample
            .skipped
            .into_iter()
            .map(|skipped| SkippedChannelRecord {
                name: skipped.name,
                reason: skipped.reason,
            })
            .collect(),
        text: sample.text,
    }
}

fn update_ts_bounds(
    first: &mut Option<OffsetDateTime>,
    last: &mut Option<OffsetDateTime>,
    ts: OffsetDateTime,
) {
    match first {
        Some(existing) if *existing <= ts => {}
        _ => *first = Some(ts),
    }
    match last {
        Some(existing) if *existing >= ts => {}
        _ => *last = Some(ts),
    }
}

fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}
