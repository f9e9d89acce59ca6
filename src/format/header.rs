//! Header section codec
//!
//! The header is a run of fields ending with an end marker. Version, UUID,
//! name and description are kept; preference, tree, timestamp, user, host,
//! filter and policy fields are consumed and dropped. The version field is
//! mandatory.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::field::Field;
use super::table::{text_value, uuid_value, Disposition, FieldTable};
use crate::database::Header;
use crate::error::{Result, SafeError};

/// Header field type bytes
pub mod kind {
    pub const VERSION: u8 = 0x00;
    pub const UUID: u8 = 0x01;
    pub const NON_DEFAULT_PREFERENCES: u8 = 0x02;
    pub const TREE_DISPLAY_STATUS: u8 = 0x03;
    pub const LAST_SAVE_TIME: u8 = 0x04;
    pub const LAST_SAVED_BY_APP: u8 = 0x06;
    pub const LAST_SAVED_BY_HOST: u8 = 0x08;
    pub const NAME: u8 = 0x09;
    pub const DESCRIPTION: u8 = 0x0a;
    pub const FILTERS: u8 = 0x0b;
    pub const RECENTLY_USED: u8 = 0x0f;
    pub const PASSWORD_POLICIES: u8 = 0x10;
    pub const EMPTY_GROUPS: u8 = 0x11;
    pub const END: u8 = 0xff;
}

/// Header attributes kept in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAttr {
    Version,
    Uuid,
    Name,
    Description,
}

/// Type table for the header section
pub struct HeaderTable;

impl FieldTable for HeaderTable {
    type Attr = HeaderAttr;
    const SECTION: &'static str = "header";

    fn lookup(kind: u8) -> Option<Disposition<HeaderAttr>> {
        use Disposition::*;

        match kind {
            kind::VERSION => Some(Store(HeaderAttr::Version)),
            kind::UUID => Some(Store(HeaderAttr::Uuid)),
            kind::NAME => Some(Store(HeaderAttr::Name)),
            kind::DESCRIPTION => Some(Store(HeaderAttr::Description)),
            kind::NON_DEFAULT_PREFERENCES..=kind::LAST_SAVED_BY_HOST
            | kind::FILTERS
            | kind::RECENTLY_USED
            | kind::PASSWORD_POLICIES
            | kind::EMPTY_GROUPS => Some(Ignore),
            kind::END => Some(End),
            _ => None,
        }
    }
}

/// Map header fields onto a [`Header`]
///
/// Fields must already have passed [`super::table::read_section`].
pub fn decode_header(fields: &[Field]) -> Result<Header> {
    let mut version = None;
    let mut header = Header {
        version: String::new(),
        uuid: Uuid::nil(),
        name: String::new(),
        description: String::new(),
    };

    for field in fields {
        let Some(Disposition::Store(attr)) = HeaderTable::lookup(field.kind) else {
            continue;
        };
        match attr {
            HeaderAttr::Version => version = Some(text_value(field, HeaderTable::SECTION)?),
            HeaderAttr::Uuid => header.uuid = uuid_value(field, HeaderTable::SECTION)?,
            HeaderAttr::Name => header.name = text_value(field, HeaderTable::SECTION)?,
            HeaderAttr::Description => {
                header.description = text_value(field, HeaderTable::SECTION)?
            }
        }
    }

    header.version = version.ok_or_else(|| SafeError::format("header has no version field"))?;
    Ok(header)
}

/// Produce the header fields for `header`, end marker included
///
/// Besides the stored attributes this writes the last-save time and the
/// saving application, as other v3 writers do.
pub fn encode_header(header: &Header, saved_at: DateTime<Utc>) -> Vec<Field> {
    let mut fields = vec![
        Field::new(kind::VERSION, header.version.as_bytes()),
        Field::new(kind::UUID, header.uuid.as_bytes().to_vec()),
        Field::new(kind::LAST_SAVE_TIME, timestamp_bytes(saved_at).to_vec()),
        Field::new(kind::LAST_SAVED_BY_APP, saved_by_app()),
    ];
    if !header.name.is_empty() {
        fields.push(Field::new(kind::NAME, header.name.as_bytes()));
    }
    if !header.description.is_empty() {
        fields.push(Field::new(kind::DESCRIPTION, header.description.as_bytes()));
    }
    fields.push(Field::empty(kind::END));
    fields
}

/// 32-bit little-endian `time_t`, clamped to the representable range
fn timestamp_bytes(at: DateTime<Utc>) -> [u8; 4] {
    let seconds = at.timestamp().clamp(0, i64::from(u32::MAX)) as u32;
    seconds.to_le_bytes()
}

fn saved_by_app() -> String {
    format!("{} V{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
