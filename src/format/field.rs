//! Length-prefixed, type-tagged field framing
//!
//! On the wire each field is:
//!
//! | bytes | content |
//! |---|---|
//! | 4 | data length `L`, little-endian |
//! | 1 | field type |
//! | `L` | data |
//! | 0..15 | zero padding up to the next 16-byte boundary |
//!
//! The boundary is measured from the start of the field. The codec knows
//! nothing about what the type bytes mean.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::BLOCK_SIZE;
use crate::error::{Result, SafeError};

/// Length prefix plus type byte
pub const FIELD_PREAMBLE: usize = 5;

/// One decoded field; the data is zeroed on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Field {
    /// Field type byte
    pub kind: u8,
    /// Raw field data
    pub data: Vec<u8>,
}

impl Field {
    pub fn new(kind: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// Field with no data, used for end markers
    pub fn empty(kind: u8) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Bytes this field occupies on the wire, padding included
    pub fn encoded_len(&self) -> usize {
        padded_len(FIELD_PREAMBLE + self.data.len())
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("kind", &format_args!("0x{:02x}", self.kind))
            .field("len", &self.data.len())
            .finish()
    }
}

/// Round up to a whole number of cipher blocks
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Read the field starting at `offset`
///
/// Returns the field and the offset where the next field starts. That
/// offset may lie past the end of `buf` when the final field is unpadded.
pub fn read_field(buf: &[u8], offset: usize) -> Result<(Field, usize)> {
    let preamble = offset
        .checked_add(FIELD_PREAMBLE)
        .and_then(|end| buf.get(offset..end))
        .ok_or(SafeError::Truncation {
            region: "field preamble",
            offset,
        })?;

    let len = u32::from_le_bytes([preamble[0], preamble[1], preamble[2], preamble[3]]) as usize;
    let kind = preamble[4];

    let start = offset + FIELD_PREAMBLE;
    let data = start
        .checked_add(len)
        .and_then(|end| buf.get(start..end))
        .ok_or(SafeError::Truncation {
            region: "field data",
            offset,
        })?;

    let next = offset + padded_len(FIELD_PREAMBLE + len);
    Ok((Field::new(kind, data), next))
}

/// Append an encoded field to `out`
pub fn write_field_into(out: &mut Vec<u8>, kind: u8, data: &[u8]) -> Result<()> {
    let len = u32::try_from(data.len())
        .map_err(|_| SafeError::format(format!("field of {} bytes is too large", data.len())))?;

    let start = out.len();
    out.extend_from_slice(&len.to_le_bytes());
    out.push(kind);
    out.extend_from_slice(data);
    out.resize(start + padded_len(FIELD_PREAMBLE + data.len()), 0);
    Ok(())
}

/// Encode a single field
pub fn write_field(kind: u8, data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(padded_len(FIELD_PREAMBLE + data.len()));
    write_field_into(&mut out, kind, data)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_layout() {
        let encoded = write_field(0x03, b"title").unwrap();
        assert_eq!(encoded.len(), 16);
        assert_eq!(&encoded[..4], &5u32.to_le_bytes());
        assert_eq!(encoded[4], 0x03);
        assert_eq!(&encoded[5..10], b"title");
        assert!(encoded[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_exact_block() {
        // 5 + 11 = 16, no padding needed
        let encoded = write_field(0x05, &[b'x'; 11]).unwrap();
        assert_eq!(encoded.len(), 16);

        // 5 + 12 = 17 spills into a second block
        let encoded = write_field(0x05, &[b'x'; 12]).unwrap();
        assert_eq!(encoded.len(), 32);
    }

    #[test]
    fn test_write_empty() {
        let encoded = write_field(0xff, &[]).unwrap();
        assert_eq!(encoded, {
            let mut expected = vec![0u8; 16];
            expected[4] = 0xff;
            expected
        });
    }

    #[test]
    fn test_read_sequence() {
        let mut buf = Vec::new();
        write_field_into(&mut buf, 0x02, b"Mail").unwrap();
        write_field_into(&mut buf, 0x05, &[b'n'; 40]).unwrap();
        write_field_into(&mut buf, 0xff, &[]).unwrap();

        let (first, next) = read_field(&buf, 0).unwrap();
        assert_eq!(first.kind, 0x02);
        assert_eq!(first.data, b"Mail");
        assert_eq!(next, 16);

        let (second, next) = read_field(&buf, next).unwrap();
        assert_eq!(second.kind, 0x05);
        assert_eq!(second.data.len(), 40);
        assert_eq!(next, 64);

        let (end, next) = read_field(&buf, next).unwrap();
        assert_eq!(end.kind, 0xff);
        assert!(end.data.is_empty());
        assert_eq!(next, buf.len());
    }

    #[test]
    fn test_read_unpadded_tail() {
        // Final field without padding: next offset runs past the buffer
        let mut buf = 3u32.to_le_bytes().to_vec();
        buf.push(0x01);
        buf.extend_from_slice(b"abc");

        let (field, next) = read_field(&buf, 0).unwrap();
        assert_eq!(field.data, b"abc");
        assert_eq!(next, 16);
    }

    #[test]
    fn test_read_truncated_preamble() {
        let buf = [1u8, 0, 0];
        assert!(matches!(
            read_field(&buf, 0),
            Err(SafeError::Truncation { region: "field preamble", offset: 0 })
        ));
        assert!(matches!(
            read_field(&buf, 100),
            Err(SafeError::Truncation { .. })
        ));
    }

    #[test]
    fn test_read_length_exceeds_buffer() {
        let mut buf = write_field(0x03, b"short").unwrap();
        buf[..4].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            read_field(&buf, 0),
            Err(SafeError::Truncation { region: "field data", offset: 0 })
        ));

        buf[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read_field(&buf, 0), Err(SafeError::Truncation { .. })));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Field::empty(0xff).encoded_len(), 16);
        assert_eq!(Field::new(0x01, vec![0u8; 16]).encoded_len(), 32);
    }

    #[test]
    fn test_debug_hides_data() {
        let printed = format!("{:?}", Field::new(0x06, "hunter2"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("0x06"));
    }
}
