use super::layout;
use crate::frames::common::buffer::ascii_lossy;
use crate::frames::{ctd, isus, storx};

/// Frame classification by 6-byte frame id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Header,
    StorX,
    Ctd,
    IsusLight,
    IsusDark,
    Unknown,
}

impl FrameKind {
    pub fn from_frame_id(id: &[u8]) -> Self {
        if id == layout::HEADER_FRAME_ID {
            FrameKind::Header
        } else if id == storx::layout::FRAME_ID {
            FrameKind::StorX
        } else if id == ctd::layout::FRAME_ID {
            FrameKind::Ctd
        } else if id == isus::layout::LIGHT_FRAME_ID {
            FrameKind::IsusLight
        } else if id == isus::layout::DARK_FRAME_ID {
            FrameKind::IsusDark
        } else {
            FrameKind::Unknown
        }
    }

    /// Declared frame length, for the fixed-length formats.
    pub fn declared_len(&self) -> Option<usize> {
        match self {
            FrameKind::StorX => Some(storx::layout::FRAME_LEN),
            FrameKind::IsusLight | FrameKind::IsusDark => Some(isus::layout::FRAME_LEN),
            FrameKind::Header | FrameKind::Ctd | FrameKind::Unknown => None,
        }
    }
}

/// One frame cut from a log file, borrowing the file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedFrame<'a> {
    /// Position of the frame in the file, starting at 0.
    pub index: usize,
    /// Byte offset of the `SAT` marker in the file.
    pub offset: usize,
    pub frame_id: String,
    pub kind: FrameKind,
    pub bytes: &'a [u8],
}

impl LoggedFrame<'_> {
    /// Frame type code, the last three characters of the frame id
    /// (`HDR`, `STX`, `SBE`, `NLB`, `NDB`).
    pub fn type_code(&self) -> &str {
        self.frame_id
            .get(layout::TYPE_CODE_RANGE)
            .or_else(|| self.frame_id.get(layout::TYPE_CODE_RANGE.start..))
            .unwrap_or("")
    }

    /// Serial number field of an instrument frame (bytes 6..10), when the
    /// frame is long enough to carry one.
    pub fn serial_number(&self) -> Option<String> {
        if self.kind == FrameKind::Header {
            return None;
        }
        self.bytes.get(layout::SERIAL_RANGE).map(ascii_lossy)
    }

    /// Text of a header frame, up to the first NUL and trimmed.
    pub fn header_text(&self) -> Option<String> {
        if self.kind != FrameKind::Header {
            return None;
        }
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        Some(ascii_lossy(&self.bytes[..end]).trim().to_string())
    }
}

/// Cut a STOR-X log file into frames.
///
/// Bytes before the first `SAT` marker are ignored.
///
/// # Examples
/// ```
/// use seaframe_core::frames::logfile::{FrameKind, split_log_file};
///
/// let frames = split_log_file(b"junkSATHDR hello\r\nSATXYZ123");
/// assert_eq!(frames.len(), 2);
/// assert_eq!(frames[0].kind, FrameKind::Header);
/// assert_eq!(frames[1].type_code(), "XYZ");
/// assert_eq!(frames[1].kind, FrameKind::Unknown);
/// ```
pub fn split_log_file(bytes: &[u8]) -> Vec<LoggedFrame<'_>> {
    let starts: Vec<usize> = bytes
        .windows(layout::FRAME_MARKER.len())
        .enumerate()
        .filter(|(_, window)| *window == layout::FRAME_MARKER)
        .map(|(offset, _)| offset)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(index, &start)| {
            let end = starts.get(index + 1).copied().unwrap_or(bytes.len());
            let frame = &bytes[start..end];
            let id = &frame[..frame.len().min(layout::FRAME_ID_LEN)];
            LoggedFrame {
                index,
                offset: start,
                frame_id: ascii_lossy(id),
                kind: FrameKind::from_frame_id(id),
                bytes: frame,
            }
        })
        .collect()
}
