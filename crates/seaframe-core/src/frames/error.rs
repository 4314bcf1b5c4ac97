use thiserror::Error;

/// Errors returned by frame decoding.
///
/// # Examples
/// ```
/// use seaframe_core::frames::FrameError;
///
/// let err = FrameError::Underflow { needed: 610, actual: 12 };
/// assert!(err.to_string().contains("frame too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame too short: need {needed} bytes, got {actual}")]
    Underflow { needed: usize, actual: usize },
    #[error("frame too long: expected {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },
    #[error("invalid timestamp: {reason}")]
    InvalidTimestamp { reason: String },
}

impl FrameError {
    pub(crate) fn invalid_timestamp(reason: impl Into<String>) -> Self {
        FrameError::InvalidTimestamp {
            reason: reason.into(),
        }
    }
}
