//! Frame error types.

use thiserror::Error;

/// Errors that can occur while framing or decoding radio frames.
///
/// None of these are fatal: the offending frame is dropped and the next one
/// is processed normally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A declared field needs more bytes than the buffer holds.
    ///
    /// Also raised for a null-terminated field whose terminator never shows up.
    #[error("truncated frame: field `{field}` runs past the end of the buffer at offset {offset}")]
    TruncatedFrame {
        /// Name of the field being decoded.
        field: &'static str,
        /// Offset at which the field starts.
        offset: usize,
    },

    /// A field the caller needs was not present in the decoded record.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The API frame checksum did not verify.
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch {
        /// Checksum computed over the frame data.
        expected: u8,
        /// Checksum byte carried by the frame.
        actual: u8,
    },

    /// Declared frame length exceeds what the radio can produce.
    #[error("frame too long: maximum {max} bytes, got {actual}")]
    FrameTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Declared length.
        actual: usize,
    },

    /// A frame with no API identifier.
    #[error("empty frame")]
    EmptyFrame,
}

/// Result type alias for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;
