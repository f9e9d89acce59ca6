//! Container formats
//!
//! A container format turns raw file bytes plus a password into a
//! [`Database`] and back. Only Password Safe v3 exists today; callers pick
//! the format by sniffing the magic tag with [`detect`].

pub mod field;
pub mod header;
pub mod record;
pub mod table;
mod v3;

pub use v3::V3Format;

use chrono::{DateTime, Utc};

use crate::config::SafeOptions;
use crate::database::Database;
use crate::error::{Result, SafeError};
use crate::{IV_LENGTH, TAG_LENGTH};

/// A concrete on-disk container layout
pub trait ContainerFormat: Sync {
    /// Human-readable format name
    fn name(&self) -> &'static str;

    /// Tag the file starts with
    fn magic(&self) -> &'static [u8];

    /// Decode and authenticate a container
    ///
    /// Either every stage succeeds and a fully populated database is
    /// returned, or nothing is.
    fn decode(&self, bytes: &[u8], password: &str, options: &SafeOptions) -> Result<Database>;

    /// Serialize and encrypt a database, stamping `saved_at` into the header
    ///
    /// Every call draws a fresh IV; the one used is returned in [`Encoded`].
    fn encode(&self, db: &Database, saved_at: DateTime<Utc>) -> Result<Encoded>;
}

/// Output of [`ContainerFormat::encode`]
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Complete container, ready to be written
    pub bytes: Vec<u8>,
    /// IV the ciphertext was produced under
    pub iv: [u8; IV_LENGTH],
    /// Integrity tag embedded in `bytes`
    pub integrity_tag: [u8; TAG_LENGTH],
}

/// Every supported format, checked in order
static FORMATS: &[&dyn ContainerFormat] = &[&V3Format];

/// Pick the format whose magic tag starts `bytes`
pub fn detect(bytes: &[u8]) -> Result<&'static dyn ContainerFormat> {
    FORMATS
        .iter()
        .copied()
        .find(|format| bytes.starts_with(format.magic()))
        .ok_or_else(|| {
            if bytes.len() < crate::MAGIC_V3.len() {
                SafeError::Truncation {
                    region: "magic tag",
                    offset: 0,
                }
            } else {
                SafeError::format("not a Password Safe v3 file")
            }
        })
}
