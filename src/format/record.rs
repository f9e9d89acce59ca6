//! Record section codec
//!
//! Same framing as the header, one section per record. UUID, group, title,
//! username, notes, password and URL are kept; expiry, autotype, history,
//! policy, run command, double-click action, email, protection, symbol and
//! policy-name fields are consumed and dropped.

use super::field::Field;
use super::table::{text_value, uuid_value, Disposition, FieldTable};
use crate::database::Record;
use crate::error::{Result, SafeError};

/// Record field type bytes
pub mod kind {
    pub const UUID: u8 = 0x01;
    pub const GROUP: u8 = 0x02;
    pub const TITLE: u8 = 0x03;
    pub const USERNAME: u8 = 0x04;
    pub const NOTES: u8 = 0x05;
    pub const PASSWORD: u8 = 0x06;
    pub const CREATION_TIME: u8 = 0x07;
    pub const PASSWORD_EXPIRY_TIME: u8 = 0x0a;
    pub const RESERVED: u8 = 0x0b;
    pub const LAST_MODIFICATION_TIME: u8 = 0x0c;
    pub const URL: u8 = 0x0d;
    pub const AUTOTYPE: u8 = 0x0e;
    pub const PASSWORD_POLICY_NAME: u8 = 0x18;
    pub const END: u8 = 0xff;
}

/// Record attributes kept in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAttr {
    Uuid,
    Group,
    Title,
    Username,
    Notes,
    Password,
    Url,
}

/// Type table for record sections
pub struct RecordTable;

impl FieldTable for RecordTable {
    type Attr = RecordAttr;
    const SECTION: &'static str = "record";

    fn lookup(kind: u8) -> Option<Disposition<RecordAttr>> {
        use Disposition::*;

        match kind {
            kind::UUID => Some(Store(RecordAttr::Uuid)),
            kind::GROUP => Some(Store(RecordAttr::Group)),
            kind::TITLE => Some(Store(RecordAttr::Title)),
            kind::USERNAME => Some(Store(RecordAttr::Username)),
            kind::NOTES => Some(Store(RecordAttr::Notes)),
            kind::PASSWORD => Some(Store(RecordAttr::Password)),
            kind::URL => Some(Store(RecordAttr::Url)),
            kind::CREATION_TIME..=kind::PASSWORD_EXPIRY_TIME
            | kind::LAST_MODIFICATION_TIME
            | kind::AUTOTYPE..=kind::PASSWORD_POLICY_NAME => Some(Ignore),
            kind::END => Some(End),
            _ => None,
        }
    }
}

/// Map one record's fields onto a [`Record`]
///
/// With `require_mandatory` set, a record without a UUID, title or
/// password is a format error; otherwise missing fields stay empty.
pub fn decode_record(fields: &[Field], require_mandatory: bool) -> Result<Record> {
    let mut record = Record::default();
    let (mut has_uuid, mut has_title, mut has_password) = (false, false, false);

    for field in fields {
        let Some(Disposition::Store(attr)) = RecordTable::lookup(field.kind) else {
            continue;
        };
        let section = RecordTable::SECTION;
        match attr {
            RecordAttr::Uuid => {
                record.uuid = uuid_value(field, section)?;
                has_uuid = true;
            }
            RecordAttr::Group => record.group = text_value(field, section)?,
            RecordAttr::Title => {
                record.title = text_value(field, section)?;
                has_title = true;
            }
            RecordAttr::Username => record.username = text_value(field, section)?,
            RecordAttr::Notes => record.notes = text_value(field, section)?,
            RecordAttr::Password => {
                record.password = text_value(field, section)?;
                has_password = true;
            }
            RecordAttr::Url => record.url = text_value(field, section)?,
        }
    }

    if require_mandatory {
        let missing: Vec<&str> = [
            (has_uuid, "uuid"),
            (has_title, "title"),
            (has_password, "password"),
        ]
        .iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(SafeError::format(format!(
                "record is missing mandatory fields: {}",
                missing.join(", ")
            )));
        }
    }

    Ok(record)
}

/// Produce the fields for one record, end marker included
///
/// UUID, title and password are always written; other text fields only
/// when non-empty.
pub fn encode_record(record: &Record) -> Vec<Field> {
    let mut fields = vec![Field::new(kind::UUID, record.uuid.as_bytes().to_vec())];

    let optional = |fields: &mut Vec<Field>, ty: u8, value: &str| {
        if !value.is_empty() {
            fields.push(Field::new(ty, value.as_bytes()));
        }
    };

    optional(&mut fields, kind::GROUP, &record.group);
    fields.push(Field::new(kind::TITLE, record.title.as_bytes()));
    optional(&mut fields, kind::USERNAME, &record.username);
    optional(&mut fields, kind::NOTES, &record.notes);
    fields.push(Field::new(kind::PASSWORD, record.password.as_bytes()));
    optional(&mut fields, kind::URL, &record.url);
    fields.push(Field::empty(kind::END));
    fields
}
