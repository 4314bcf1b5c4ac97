use thiserror::Error;

/// Errors returned while building a calibration catalog.
///
/// The parse is atomic: any of these means no catalog was produced.
///
/// # Examples
/// ```
/// use seaframe_core::calibration::{CalibrationCatalog, MalformedKind, ParseError};
///
/// let err = "NITRATE NONE 'uM' 4 BF 2 POLYU\n0.0 1.0\n"
///     .parse::<CalibrationCatalog>()
///     .unwrap_err();
/// assert!(matches!(
///     err,
///     ParseError::Malformed {
///         kind: MalformedKind::CoefficientLinesMismatch { declared: 2, found: 1, .. },
///         ..
///     }
/// ));
/// ```
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read calibration source {location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },
    #[error(
        "unsupported calibration source {location}: expected a file path, file:// or http(s):// URL"
    )]
    UnsupportedSource { location: String },
    #[error("failed to fetch calibration source {location}: {message}")]
    Fetch { location: String, message: String },
    #[error("malformed calibration file at line {line}: {kind}")]
    Malformed { line: usize, kind: MalformedKind },
}

/// What made a calibration file line unacceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedKind {
    #[error("non-numeric coefficient token '{token}'")]
    InvalidNumber { token: String },
    #[error("definition line has {found} fields, expected 7")]
    TooFewFields { found: usize },
    #[error("{field} is not an integer: '{token}'")]
    InvalidInteger { field: &'static str, token: String },
    #[error("{key} declares {declared} coefficient lines but {found} follow")]
    CoefficientLinesMismatch {
        key: String,
        declared: usize,
        found: usize,
    },
    #[error("coefficient line outside of a calibration entry")]
    UnexpectedCoefficientLine,
}

/// Errors returned when applying a calibration to a raw value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("no calibration for variable '{name}'")]
    UnknownVariable { name: String },
    #[error("unknown fit type '{name}'")]
    UnknownFitType { name: String },
    #[error("{fit} needs {required} coefficients, got {actual}")]
    InsufficientCoefficients {
        fit: String,
        required: usize,
        actual: usize,
    },
    #[error("{fit} cannot be applied to a {kind} value")]
    UnsupportedFit { fit: String, kind: &'static str },
    #[error("raw value for '{name}' is not finite: {value}")]
    NonFiniteInput { name: String, value: f64 },
    #[error("calibrated value for '{name}' is not finite: {value}")]
    NonFiniteResult { name: String, value: f64 },
}
