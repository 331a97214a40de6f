//! Field-layout driven record decoding.
//!
//! Every frame body the radio produces is a flat run of fields. A [`Layout`]
//! describes them in order and [`decode`] splits a buffer accordingly:
//!
//! ```text
//! +-------------+----------------------+-------------------+
//! | fixed(n)    | null terminated ...0 | remainder ...     |
//! +-------------+----------------------+-------------------+
//! ```
//!
//! Decoding only reads and copies; it never touches state outside the
//! returned [`Fields`].

use crate::error::{FrameError, FrameResult};

/// How many bytes a field occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Exactly this many bytes.
    Fixed(usize),
    /// Bytes up to the next zero byte. The terminator is consumed but is not
    /// part of the value.
    NullTerminated,
    /// Everything left in the buffer. The field is omitted when nothing
    /// remains.
    Remainder,
}

/// A named field in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used to look the value up after decoding.
    pub name: &'static str,
    /// Field width.
    pub width: Width,
}

impl Field {
    /// A fixed-width field.
    pub const fn fixed(name: &'static str, len: usize) -> Self {
        Field {
            name,
            width: Width::Fixed(len),
        }
    }

    /// A null-terminated field.
    pub const fn null_terminated(name: &'static str) -> Self {
        Field {
            name,
            width: Width::NullTerminated,
        }
    }

    /// A trailing field that takes the rest of the buffer.
    pub const fn remainder(name: &'static str) -> Self {
        Field {
            name,
            width: Width::Remainder,
        }
    }
}

/// An ordered field layout.
pub type Layout = [Field];

/// Decoded field values, in layout order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(&'static str, Vec<u8>)>,
    consumed: usize,
}

impl Fields {
    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_slice())
    }

    /// Look up a field that must be present.
    pub fn require(&self, name: &'static str) -> FrameResult<&[u8]> {
        self.get(name).ok_or(FrameError::MissingField(name))
    }

    /// Read a single-byte field.
    pub fn byte(&self, name: &'static str) -> FrameResult<u8> {
        let [value] = self.array::<1>(name)?;
        Ok(value)
    }

    /// Read a field into a fixed-size array.
    pub fn array<const N: usize>(&self, name: &'static str) -> FrameResult<[u8; N]> {
        self.require(name)?
            .try_into()
            .map_err(|_| FrameError::MissingField(name))
    }

    /// Copy out an optional trailing field, empty when it was omitted.
    pub fn bytes_or_empty(&self, name: &str) -> Vec<u8> {
        self.get(name).map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// Number of decoded fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fields were decoded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of input bytes consumed, including null terminators.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Decode `data` according to `layout`.
///
/// Fails with [`FrameError::TruncatedFrame`] when a fixed-width field runs
/// past the end of the buffer or a null-terminated field has no terminator.
/// Decoding stops after a [`Width::Remainder`] field; bytes left over after
/// the last field are ignored.
pub fn decode(data: &[u8], layout: &Layout) -> FrameResult<Fields> {
    let mut entries = Vec::with_capacity(layout.len());
    let mut offset = 0;

    for field in layout {
        let remaining = &data[offset..];
        match field.width {
            Width::Fixed(len) => {
                if remaining.len() < len {
                    return Err(FrameError::TruncatedFrame {
                        field: field.name,
                        offset,
                    });
                }
                entries.push((field.name, remaining[..len].to_vec()));
                offset += len;
            }
            Width::NullTerminated => {
                let end = remaining.iter().position(|&b| b == 0).ok_or(
                    FrameError::TruncatedFrame {
                        field: field.name,
                        offset,
                    },
                )?;
                entries.push((field.name, remaining[..end].to_vec()));
                offset += end + 1;
            }
            Width::Remainder => {
                if !remaining.is_empty() {
                    entries.push((field.name, remaining.to_vec()));
                    offset = data.len();
                }
                break;
            }
        }
    }

    Ok(Fields {
        entries,
        consumed: offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &Layout = &[
        Field::fixed("addr", 2),
        Field::null_terminated("name"),
        Field::fixed("kind", 1),
        Field::remainder("rest"),
    ];

    #[test]
    fn test_decode_all_widths() {
        let data = [0x12, 0x34, b'a', b'b', 0x00, 0x07, 0xAA, 0xBB];
        let fields = decode(&data, LAYOUT).unwrap();

        assert_eq!(fields.get("addr"), Some(&[0x12, 0x34][..]));
        assert_eq!(fields.get("name"), Some(&b"ab"[..]));
        assert_eq!(fields.byte("kind").unwrap(), 0x07);
        assert_eq!(fields.get("rest"), Some(&[0xAA, 0xBB][..]));
        assert_eq!(fields.len(), 4);
        assert_eq!(fields.consumed(), data.len());
    }

    #[test]
    fn test_fixed_field_truncated() {
        // Shorter than the fixed fields alone.
        let layout = [Field::fixed("a", 2), Field::fixed("b", 8)];
        for len in 0..10 {
            let data = vec![0xFF; len];
            let err = decode(&data, &layout).unwrap_err();
            assert!(matches!(err, FrameError::TruncatedFrame { .. }), "len {len}");
        }
        assert!(decode(&[0xFF; 10], &layout).is_ok());
    }

    #[test]
    fn test_truncated_reports_field_and_offset() {
        let err = decode(&[0x12, 0x34, b'a', 0x00], LAYOUT).unwrap_err();
        assert_eq!(
            err,
            FrameError::TruncatedFrame {
                field: "kind",
                offset: 4
            }
        );
    }

    #[test]
    fn test_null_terminated_missing_terminator() {
        let err = decode(&[0x12, 0x34, b'a', b'b', b'c'], LAYOUT).unwrap_err();
        assert_eq!(
            err,
            FrameError::TruncatedFrame {
                field: "name",
                offset: 2
            }
        );
    }

    #[test]
    fn test_null_terminated_excludes_terminator_and_advances_past_it() {
        let layout = [Field::null_terminated("name")];
        let fields = decode(b"node\0trailing", &layout).unwrap();
        assert_eq!(fields.get("name"), Some(&b"node"[..]));
        assert_eq!(fields.consumed(), 5);

        let fields = decode(b"\0", &layout).unwrap();
        assert_eq!(fields.get("name"), Some(&b""[..]));
        assert_eq!(fields.consumed(), 1);
    }

    #[test]
    fn test_remainder_omitted_when_empty() {
        let fields = decode(&[0x12, 0x34, 0x00, 0x07], LAYOUT).unwrap();
        assert_eq!(fields.len(), 3);
        assert!(fields.get("rest").is_none());
        assert!(fields.bytes_or_empty("rest").is_empty());
        assert_eq!(fields.require("rest"), Err(FrameError::MissingField("rest")));
    }

    #[test]
    fn test_array_and_byte_accessors() {
        let layout = [Field::fixed("pair", 2), Field::fixed("one", 1)];
        let fields = decode(&[1, 2, 3], &layout).unwrap();
        assert_eq!(fields.array::<2>("pair").unwrap(), [1, 2]);
        assert_eq!(fields.byte("one").unwrap(), 3);
        assert!(fields.byte("pair").is_err());
    }
}
