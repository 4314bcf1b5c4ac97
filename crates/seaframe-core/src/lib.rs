//! Seaframe core library: oceanographic instrument frame decoding and
//! calibration.
//!
//! This crate turns raw instrument telemetry into calibrated, named
//! channels. Decoders (layout/parser per wire format) read fixed binary
//! layouts into typed records, the calibration module parses Satlantic
//! coefficient files and applies their fits, and assemblers combine the two
//! into samples for a downstream publisher. Offline pipelines replay STOR-X
//! log files and ADAM packet captures into a deterministic report.
//! Parsing is byte-oriented and side-effect free; file I/O is isolated in
//! `source`, `calibration::source` and `pipeline`.
//!
//! Invariants:
//! - A frame decodes completely or is rejected; nothing is padded.
//! - A calibration catalog is immutable once parsed and shared read-only.
//! - One bad frame or channel never aborts the rest of a run.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use seaframe_core::config::InstrumentConfig;
//! use seaframe_core::process_log_file;
//!
//! let config = InstrumentConfig::load(Path::new("deployment.json"))?;
//! let report = process_log_file(Path::new("STORX0318.raw"), &config)?;
//! println!("{} samples", report.samples.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod assembly;
pub mod calibration;
pub mod config;
pub mod frames;
mod pipeline;
pub mod publish;
pub mod source;

pub use pipeline::{
    PipelineError, process_adam_capture, process_adam_source, process_log_bytes, process_log_file,
};
pub use source::{CapturedPacket, PacketSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no sample time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of one processing run, with samples in input order.
///
/// # Examples
/// ```
/// use seaframe_core::make_stub_report;
///
/// let report = make_stub_report("STORX0318.raw", 123);
/// assert_eq!(report.report_version, seaframe_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp of the last published sample, or the epoch.
    pub generated_at: String,

    /// Input file metadata.
    pub input: InputInfo,

    /// Frame counts and time span (absent on a stub report).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<FrameSummary>,
    /// Assembled samples in input order.
    pub samples: Vec<SampleRecord>,
    /// Frames that could not be decoded or calibrated, in input order.
    pub rejected: Vec<RejectedFrame>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use seaframe_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "seaframe".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "seaframe");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the pipeline.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Frame counts of a run.
///
/// Every frame is counted once in exactly one of `samples`, `skipped`
/// or `rejected`.
///
/// # Examples
/// ```
/// use seaframe_core::FrameSummary;
///
/// let summary = FrameSummary {
///     frames_total: 3,
///     samples: 1,
///     skipped: 1,
///     rejected: 1,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.samples + summary.skipped + summary.rejected, summary.frames_total);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSummary {
    pub frames_total: u64,
    pub samples: u64,
    /// Header frames, non-data CTD lines and non-matching packets.
    pub skipped: u64,
    pub rejected: u64,
    /// RFC3339 timestamp of the earliest sample (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the latest sample (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// One assembled sample.
///
/// # Examples
/// ```
/// use seaframe_core::{ChannelRecord, SampleRecord};
///
/// let sample = SampleRecord {
///     index: 4,
///     frame_id: "SATSTX".to_string(),
///     serial_number: Some("0318".to_string()),
///     timestamp: "2010-11-12T16:13:00-10:00".to_string(),
///     sample_time: None,
///     channels: vec![ChannelRecord {
///         name: "internalVoltage".to_string(),
///         value: 12.1,
///         units: "V".to_string(),
///     }],
///     skipped_channels: Vec::new(),
///     text: None,
/// };
/// assert_eq!(sample.channels[0].units, "V");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Frame or packet position in the input, starting at 0.
    pub index: u64,
    pub frame_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// RFC3339 publish timestamp (logger or capture time).
    pub timestamp: String,
    /// RFC3339 sample time reported by the instrument, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_time: Option<String>,
    pub channels: Vec<ChannelRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_channels: Vec<SkippedChannelRecord>,
    /// Raw text of instruments published without conversion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub name: String,
    pub value: f64,
    pub units: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedChannelRecord {
    pub name: String,
    pub reason: String,
}

/// A frame dropped from the run and why.
///
/// # Examples
/// ```
/// use seaframe_core::RejectedFrame;
///
/// let rejected = RejectedFrame {
///     index: 7,
///     frame_type: "NLB".to_string(),
///     serial_number: Some("0265".to_string()),
///     reason: "frame too short: need 610 bytes, got 120".to_string(),
/// };
/// assert_eq!(rejected.frame_type, "NLB");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedFrame {
    pub index: u64,
    /// Frame type code (`STX`, `NLB`, ...) or the digitizer name.
    pub frame_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub reason: String,
}

/// Build a stub report with base fields filled and no samples.
///
/// # Examples
/// ```
/// use seaframe_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.input.bytes, 123);
/// assert!(report.samples.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "seaframe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: None,
        samples: vec![],
        rejected: vec![],
    }
}
