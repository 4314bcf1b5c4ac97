use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use time::UtcOffset;

use super::catalogs::CatalogCache;
use super::{PipelineError, RunReport};
use crate::Report;
use crate::assembly::{Sample, assemble_ctd, assemble_isus, assemble_storx};
use crate::calibration::CalibrationCatalog;
use crate::config::InstrumentConfig;
use crate::frames::FrameError;
use crate::frames::ctd::parse_ctd_frame;
use crate::frames::isus::parse_isus_frame;
use crate::frames::logfile::{FrameKind, LoggedFrame, split_log_file};
use crate::frames::storx::parse_storx_frame;

/// Why a single log frame was dropped.
#[derive(Debug, Error)]
enum Rejection {
    #[error("unknown frame id '{0}'")]
    UnknownFrame(String),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("no sensor configured for serial number {0}")]
    UnknownSensor(String),
    #[error("sensor {serial_number} has no calibration for {type_code} frames")]
    MissingCalibration {
        serial_number: String,
        type_code: String,
    },
    #[error("{0}")]
    Catalog(String),
}

enum Outcome {
    Sample(Sample),
    Skipped(&'static str),
}

/// Decode a STOR-X log file and calibrate every instrument frame in it.
pub fn process_log_file(path: &Path, config: &InstrumentConfig) -> Result<Report, PipelineError> {
    let bytes = std::fs::read(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    process_log_bytes(&path.display().to_string(), &bytes, config)
}

/// Like [`process_log_file`] over log bytes already in memory.
///
/// # Examples
/// ```
/// use seaframe_core::config::InstrumentConfig;
/// use seaframe_core::process_log_bytes;
///
/// let report = process_log_bytes("mem.raw", b"SATHDR STOR-X\0SATZZZ", &InstrumentConfig::default())?;
/// let summary = report.summary.unwrap();
/// assert_eq!((summary.frames_total, summary.skipped, summary.rejected), (2, 1, 1));
/// # Ok::<(), seaframe_core::PipelineError>(())
/// ```
pub fn process_log_bytes(
    input_path: &str,
    bytes: &[u8],
    config: &InstrumentConfig,
) -> Result<Report, PipelineError> {
    let offset = config.logger_offset()?;
    let mut catalogs = CatalogCache::default();
    let mut run = RunReport::new(input_path, bytes.len() as u64);

    for frame in split_log_file(bytes) {
        run.frame_seen();
        match process_frame(&frame, config, offset, &mut catalogs) {
            Ok(Outcome::Sample(sample)) => run.sample(frame.index, sample),
            Ok(Outcome::Skipped(why)) => {
                tracing::debug!(index = frame.index, frame_id = %frame.frame_id, why, "frame skipped");
                run.skip();
            }
            Err(rejection) => run.reject(
                frame.index,
                frame.type_code(),
                frame.serial_number(),
                rejection.to_string(),
            ),
        }
    }

    tracing::debug!(input = input_path, catalogs = catalogs.len(), "log file processed");
    Ok(run.finish())
}

fn process_frame(
    frame: &LoggedFrame<'_>,
    config: &InstrumentConfig,
    offset: UtcOffset,
    catalogs: &mut CatalogCache,
) -> Result<Outcome, Rejection> {
    match frame.kind {
        FrameKind::Header => {
            if let Some(text) = frame.header_text() {
                tracing::info!(header = %text, "log file header");
            }
            Ok(Outcome::Skipped("header"))
        }
        FrameKind::Unknown => Err(Rejection::UnknownFrame(frame.frame_id.clone())),
        FrameKind::Ctd => {
            let ctd = parse_ctd_frame(frame.bytes)?;
            if !ctd.is_data_sample() {
                return Ok(Outcome::Skipped("not a CTD data line"));
            }
            Ok(Outcome::Sample(assemble_ctd(&ctd, offset)?))
        }
        FrameKind::StorX => {
            let storx = parse_storx_frame(frame.bytes)?;
            let (catalog, is_immersed) =
                sensor_catalog(&storx.serial_number, frame.type_code(), config, catalogs)?;
            Ok(Outcome::Sample(assemble_storx(&storx, &catalog, is_immersed, offset)?))
        }
        FrameKind::IsusLight | FrameKind::IsusDark => {
            let isus = parse_isus_frame(frame.bytes)?;
            let (catalog, is_immersed) =
                sensor_catalog(isus.serial_number(), frame.type_code(), config, catalogs)?;
            Ok(Outcome::Sample(assemble_isus(&isus, &catalog, is_immersed, offset)?))
        }
    }
}

/// Catalog and immersion flag of the sensor that produced a frame.
fn sensor_catalog(
    serial_number: &str,
    type_code: &str,
    config: &InstrumentConfig,
    catalogs: &mut CatalogCache,
) -> Result<(Arc<CalibrationCatalog>, bool), Rejection> {
    let sensor = config
        .sensor(serial_number)
        .ok_or_else(|| Rejection::UnknownSensor(serial_number.to_string()))?;
    let location = sensor
        .calibration_for(type_code)
        .ok_or_else(|| Rejection::MissingCalibration {
            serial_number: serial_number.to_string(),
            type_code: type_code.to_string(),
        })?;
    let catalog = catalogs.get(location).map_err(Rejection::Catalog)?;
    Ok((catalog, sensor.is_immersed))
}
