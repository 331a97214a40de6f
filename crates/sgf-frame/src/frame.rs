//! Frame encoding/decoding utilities.
//!
//! XBee radios in API mode wrap every message in a delimited, checksummed
//! frame:
//!
//! ```text
//! +------+--------+--------+-------------------+----------+
//! | 0x7E | len_hi | len_lo | data[0..len]      | checksum |
//! +------+--------+--------+-------------------+----------+
//! ```
//!
//! `data[0]` is the API identifier. The checksum is `0xFF` minus the low byte
//! of the sum of the frame data.

use bytes::{Buf, BufMut, BytesMut};

use crate::constants::{MAX_FRAME_DATA, START_DELIMITER};
use crate::error::{FrameError, FrameResult};
use crate::inbound::InboundFrame;

/// Bytes of framing around the frame data (delimiter, length, checksum).
const FRAME_OVERHEAD: usize = 4;

/// Compute the API frame checksum over `data`.
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0xFF - sum
}

/// A codec for reading and writing API frames.
#[derive(Debug, Default)]
pub struct ApiFrameCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl ApiFrameCodec {
    /// Create a new frame codec.
    pub fn new() -> Self {
        ApiFrameCodec {
            buffer: BytesMut::with_capacity(MAX_FRAME_DATA + FRAME_OVERHEAD),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode a complete frame from the buffer.
    ///
    /// Returns `None` if more data is needed, `Some(Ok(frame_data))` for a
    /// verified frame, or `Some(Err(_))` for a frame that had to be dropped.
    /// After an error the codec has already resynchronised, so callers simply
    /// keep calling `decode`.
    pub fn decode(&mut self) -> Option<FrameResult<Vec<u8>>> {
        // Scan for the start delimiter, discarding any preceding garbage
        let skip = self
            .buffer
            .iter()
            .position(|&b| b == START_DELIMITER)
            .unwrap_or(self.buffer.len());
        if skip > 0 {
            log::trace!("discarding {} bytes before start delimiter", skip);
            self.buffer.advance(skip);
        }

        // Need the delimiter plus the 2-byte length
        if self.buffer.len() < 3 {
            return None;
        }

        let len = u16::from_be_bytes([self.buffer[1], self.buffer[2]]) as usize;

        if len > MAX_FRAME_DATA {
            // Probably a stray 0x7E inside another frame; drop it and rescan.
            self.buffer.advance(1);
            return Some(Err(FrameError::FrameTooLong {
                max: MAX_FRAME_DATA,
                actual: len,
            }));
        }

        if self.buffer.len() < len + FRAME_OVERHEAD {
            return None;
        }

        self.buffer.advance(3);
        let data = self.buffer.split_to(len).to_vec();
        let actual = self.buffer.get_u8();

        if data.is_empty() {
            return Some(Err(FrameError::EmptyFrame));
        }

        let expected = checksum(&data);
        if expected != actual {
            return Some(Err(FrameError::ChecksumMismatch { expected, actual }));
        }

        Some(Ok(data))
    }

    /// Wrap frame data with delimiter, length and checksum.
    pub fn encode(data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(data.len() + FRAME_OVERHEAD);
        buf.push(START_DELIMITER);
        buf.put_u16(data.len() as u16);
        buf.extend_from_slice(data);
        buf.push(checksum(data));
        buf
    }
}

/// Turns a raw byte stream from the radio into typed frames.
///
/// This can be used with any byte stream (serial port, TCP bridge, etc.).
#[derive(Debug, Default)]
pub struct FrameReader {
    codec: ApiFrameCodec,
}

impl FrameReader {
    /// Create a new frame reader.
    pub fn new() -> Self {
        FrameReader {
            codec: ApiFrameCodec::new(),
        }
    }

    /// Feed received data into the decoder.
    pub fn feed(&mut self, data: &[u8]) {
        self.codec.push(data);
    }

    /// Try to decode the next frame.
    ///
    /// Returns `None` if more data is needed, otherwise the decoded frame or
    /// the reason it was dropped.
    pub fn next_frame(&mut self) -> Option<FrameResult<InboundFrame>> {
        self.codec
            .decode()
            .map(|result| result.and_then(|data| InboundFrame::decode(&data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        // Local AT command "NJ", frame id 1
        assert_eq!(checksum(&[0x08, 0x01, 0x4E, 0x4A]), 0x5E);
    }

    #[test]
    fn test_frame_codec_encode_decode() {
        let mut codec = ApiFrameCodec::new();

        let data = [0x08, 0x01, b'N', b'D'];
        let encoded = ApiFrameCodec::encode(&data);

        assert_eq!(encoded.len(), data.len() + 4);
        assert_eq!(encoded[0], 0x7E);
        assert_eq!(&encoded[1..3], &[0x00, 0x04]);
        assert_eq!(*encoded.last().unwrap(), checksum(&data));

        codec.push(&encoded);
        let decoded = codec.decode().expect("should decode frame").unwrap();
        assert_eq!(decoded, data);
        assert!(codec.decode().is_none());
    }

    #[test]
    fn test_frame_codec_partial() {
        let mut codec = ApiFrameCodec::new();
        let encoded = ApiFrameCodec::encode(b"\x90partial");

        codec.push(&encoded[..5]);
        assert!(codec.decode().is_none());

        codec.push(&encoded[5..]);
        let decoded = codec.decode().expect("should decode frame").unwrap();
        assert_eq!(decoded, b"\x90partial");
    }

    #[test]
    fn test_frame_codec_skips_garbage_and_bad_checksum() {
        let mut codec = ApiFrameCodec::new();

        let mut corrupt = ApiFrameCodec::encode(b"\x90first");
        *corrupt.last_mut().unwrap() ^= 0xFF;
        let good = ApiFrameCodec::encode(b"\x90second");

        codec.push(&[0x00, 0x11, 0x22]);
        codec.push(&corrupt);
        codec.push(&good);

        assert!(matches!(
            codec.decode(),
            Some(Err(FrameError::ChecksumMismatch { .. }))
        ));
        assert_eq!(codec.decode().unwrap().unwrap(), b"\x90second");
        assert!(codec.decode().is_none());
    }

    #[test]
    fn test_frame_codec_rejects_oversized_length() {
        let mut codec = ApiFrameCodec::new();
        codec.push(&[0x7E, 0xFF, 0xFF, 0x00]);
        codec.push(&ApiFrameCodec::encode(b"\x8B\x01\x00\x00\x00\x00\x00"));

        assert!(matches!(
            codec.decode(),
            Some(Err(FrameError::FrameTooLong { actual: 0xFFFF, .. }))
        ));
        assert!(codec.decode().unwrap().is_ok());
    }

    #[test]
    fn test_frame_reader_yields_typed_frames() {
        let mut reader = FrameReader::new();
        reader.feed(&ApiFrameCodec::encode(&[0x8B, 0x01, 0x12, 0x34, 0x02, 0x00, 0x00]));

        match reader.next_frame() {
            Some(Ok(InboundFrame::TxStatus { retries, .. })) => assert_eq!(retries, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(reader.next_frame().is_none());
    }
}
