use crate::frames::error::FrameError;

/// Forward-only cursor over one complete instrument frame.
///
/// Every read advances the cursor by the field width and fails with
/// [`FrameError::Underflow`] instead of reading past the end of the frame.
/// Multi-byte numbers are big-endian, as emitted by the Satlantic and
/// Advantech instruments.
///
/// # Examples
/// ```
/// use seaframe_core::frames::FrameBuffer;
///
/// let bytes = [0x00, 0x1E, 0xAC, 0xCC, 0xFF];
/// let mut buffer = FrameBuffer::new(&bytes);
/// assert_eq!(buffer.read_i32_be().unwrap(), 2010316);
/// assert_eq!(buffer.read_u8().unwrap(), 0xFF);
/// assert!(buffer.finish().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuffer<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Wrap a frame whose length must equal the format's declared length.
    ///
    /// # Errors
    /// Returns `FrameError::Underflow` for short input and
    /// `FrameError::TrailingBytes` for long input.
    pub fn with_declared_len(bytes: &'a [u8], declared: usize) -> Result<Self, FrameError> {
        if bytes.len() < declared {
            return Err(FrameError::Underflow {
                needed: declared,
                actual: bytes.len(),
            });
        }
        if bytes.len() > declared {
            return Err(FrameError::TrailingBytes {
                expected: declared,
                actual: bytes.len(),
            });
        }
        Ok(Self::new(bytes))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], FrameError> {
        let end = self
            .position
            .checked_add(len)
            .ok_or(FrameError::Underflow {
                needed: usize::MAX,
                actual: self.bytes.len(),
            })?;
        let slice = self
            .bytes
            .get(self.position..end)
            .ok_or(FrameError::Underflow {
                needed: end,
                actual: self.bytes.len(),
            })?;
        self.position = end;
        Ok(slice)
    }

    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], FrameError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, FrameError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, FrameError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    pub fn read_u24_be(&mut self) -> Result<u32, FrameError> {
        let [hi, mid, lo] = self.take_array::<3>()?;
        Ok(u32::from_be_bytes([0, hi, mid, lo]))
    }

    pub fn read_i32_be(&mut self) -> Result<i32, FrameError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_f32_be(&mut self) -> Result<f32, FrameError> {
        Ok(f32::from_be_bytes(self.take_array()?))
    }

    pub fn read_f64_be(&mut self) -> Result<f64, FrameError> {
        Ok(f64::from_be_bytes(self.take_array()?))
    }

    /// Read `len` bytes as US-ASCII text; non-ASCII bytes become U+FFFD.
    pub fn read_ascii(&mut self, len: usize) -> Result<String, FrameError> {
        Ok(ascii_lossy(self.take(len)?))
    }

    /// Consume the cursor, asserting that every byte of the frame was read.
    pub fn finish(self) -> Result<(), FrameError> {
        if self.position != self.bytes.len() {
            return Err(FrameError::TrailingBytes {
                expected: self.position,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }
}

pub(crate) fn ascii_lossy(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                b as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}
