//! Satlantic calibration files and fits.
//!
//! A calibration (or telemetry definition) file is line oriented:
//! - `#` comments and blank lines are skipped;
//! - a definition line `type id units fieldLength dataType coeffLines fitType`
//!   opens an entry keyed by `type`, or `type_id` when `id` is not `NONE`;
//! - the next `coeffLines` numeric lines hold the entry's coefficients.
//!
//! Parsing is atomic: a coefficient-count mismatch or a bad token rejects
//! the whole file. The resulting [`CalibrationCatalog`] is immutable and is
//! read through a [`CalibrationEngine`], which dispatches on [`FitType`].
//!
//! Version française (résumé):
//! Lecture des fichiers de calibration Satlantic et application des
//! ajustements (POLYU, POLYF, OPTIC2, identité). Le catalogue est immuable
//! et partageable entre threads.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod fit;
pub mod source;

pub use catalog::{CalibrationCatalog, CalibrationEntry};
pub use engine::{CalibrationEngine, apply_fit, apply_text_fit};
pub use error::{CalibrationError, MalformedKind, ParseError};
pub use fit::FitType;
pub use source::{CalibrationLocation, read_calibration_source};
