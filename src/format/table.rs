//! Field-type dispatch shared by the header and record codecs
//!
//! Each section has a closed table mapping a type byte to what the codec
//! does with it. A type byte missing from the table is a hard format error.

use uuid::Uuid;
use zeroize::Zeroize;

use super::field::{read_field, Field};
use crate::UUID_LENGTH;
use crate::error::{Result, SafeError};

/// What a section does with a field type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition<A> {
    /// Map the value onto an attribute
    Store(A),
    /// Known type, consumed for framing and otherwise discarded
    Ignore,
    /// End-of-section marker
    End,
}

/// Lookup table for one kind of section
pub trait FieldTable {
    /// Attribute a stored field maps to
    type Attr: Copy;

    /// Section name used in error messages
    const SECTION: &'static str;

    /// `None` for type bytes the format does not define
    fn lookup(kind: u8) -> Option<Disposition<Self::Attr>>;
}

/// The raw fields of one section, end marker included
#[derive(Debug)]
pub struct Section {
    pub fields: Vec<Field>,
    /// Offset just past the section
    pub end: usize,
}

/// Read fields from `start` up to and including the end marker
///
/// Type bytes are validated against the table, values are left raw.
pub fn read_section<T: FieldTable>(buf: &[u8], start: usize) -> Result<Section> {
    let mut fields = Vec::new();
    let mut offset = start;

    loop {
        if offset >= buf.len() {
            return Err(SafeError::format(format!(
                "missing end-of-{} marker",
                T::SECTION
            )));
        }

        let (field, next) = read_field(buf, offset)?;
        match T::lookup(field.kind) {
            None => {
                return Err(SafeError::format(format!(
                    "unknown {} field type 0x{:02x} at offset {}",
                    T::SECTION,
                    field.kind,
                    offset
                )));
            }
            Some(Disposition::End) => {
                // The end marker's declared length counts once more past its padding
                let end = next + field.data.len();
                fields.push(field);
                return Ok(Section { fields, end });
            }
            Some(_) => fields.push(field),
        }

        offset = next;
    }
}

/// Decode a text value
pub fn text_value(field: &Field, section: &str) -> Result<String> {
    String::from_utf8(field.data.clone()).map_err(|err| {
        err.into_bytes().zeroize();
        SafeError::format(format!(
            "{} field 0x{:02x} is not valid UTF-8",
            section, field.kind
        ))
    })
}

/// Decode a 16-byte UUID value
pub fn uuid_value(field: &Field, section: &str) -> Result<Uuid> {
    if field.data.len() != UUID_LENGTH {
        return Err(SafeError::format(format!(
            "{} UUID is {} bytes, expected {}",
            section,
            field.data.len(),
            UUID_LENGTH
        )));
    }
    Uuid::from_slice(&field.data).map_err(|e| SafeError::format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::field::write_field_into;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestAttr {
        Name,
    }

    struct TestTable;

    impl FieldTable for TestTable {
        type Attr = TestAttr;
        const SECTION: &'static str = "test";

        fn lookup(kind: u8) -> Option<Disposition<TestAttr>> {
            match kind {
                0x01 => Some(Disposition::Store(TestAttr::Name)),
                0x02 => Some(Disposition::Ignore),
                0xff => Some(Disposition::End),
                _ => None,
            }
        }
    }

    #[test]
    fn test_read_section() {
        let mut buf = Vec::new();
        write_field_into(&mut buf, 0x01, b"name").unwrap();
        write_field_into(&mut buf, 0x02, b"skipped").unwrap();
        write_field_into(&mut buf, 0xff, &[]).unwrap();
        write_field_into(&mut buf, 0x01, b"next section").unwrap();

        let section = read_section::<TestTable>(&buf, 0).unwrap();
        assert_eq!(section.fields.len(), 3);
        assert_eq!(section.end, 48);
        assert_eq!(
            TestTable::lookup(section.fields[0].kind),
            Some(Disposition::Store(TestAttr::Name))
        );
    }

    #[test]
    fn test_end_length_counts_twice() {
        let mut buf = Vec::new();
        write_field_into(&mut buf, 0xff, b"xyz").unwrap();
        buf.resize(64, 0);

        let section = read_section::<TestTable>(&buf, 0).unwrap();
        assert_eq!(section.end, 16 + 3);
    }

    #[test]
    fn test_unknown_type_fails_closed() {
        let mut buf = Vec::new();
        write_field_into(&mut buf, 0x01, b"name").unwrap();
        write_field_into(&mut buf, 0x42, b"?").unwrap();
        write_field_into(&mut buf, 0xff, &[]).unwrap();

        match read_section::<TestTable>(&buf, 0) {
            Err(SafeError::Format(msg)) => assert!(msg.contains("0x42")),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_end_marker() {
        let mut buf = Vec::new();
        write_field_into(&mut buf, 0x01, b"name").unwrap();

        match read_section::<TestTable>(&buf, 0) {
            Err(SafeError::Format(msg)) => assert!(msg.contains("end-of-test")),
            other => panic!("Expected Format error, got {:?}", other),
        }
        assert!(read_section::<TestTable>(&[], 0).is_err());
    }

    #[test]
    fn test_text_value() {
        assert_eq!(text_value(&Field::new(0x01, "héllo"), "test").unwrap(), "héllo");
        assert!(matches!(
            text_value(&Field::new(0x01, vec![0xff, 0xfe]), "test"),
            Err(SafeError::Format(_))
        ));
    }

    #[test]
    fn test_uuid_value() {
        let id = Uuid::new_v4();
        assert_eq!(uuid_value(&Field::new(0x01, id.as_bytes().to_vec()), "test").unwrap(), id);
        assert!(uuid_value(&Field::new(0x01, vec![1u8; 15]), "test").is_err());
    }
}
