//! HMAC-SHA-256 integrity tag
//!
//! The tag covers the data of every header and record field in file order.
//! Length prefixes, type bytes and padding are not included.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::secret::SecretKey;
use crate::error::{Result, SafeError};
use crate::TAG_LENGTH;

type HmacSha256 = Hmac<Sha256>;

/// Incremental integrity tag over field values
pub struct IntegrityMac(HmacSha256);

impl IntegrityMac {
    /// Start a tag keyed by the authentication key
    pub fn new(key: &SecretKey) -> Result<Self> {
        HmacSha256::new_from_slice(key.as_bytes())
            .map(Self)
            .map_err(|_| SafeError::format("invalid authentication key length"))
    }

    /// Feed one field value
    pub fn update(&mut self, value: &[u8]) {
        self.0.update(value);
    }

    /// Finish and return the tag
    pub fn finalize(self) -> [u8; TAG_LENGTH] {
        self.0.finalize().into_bytes().into()
    }

    /// Finish and compare against a stored tag in constant time
    ///
    /// Returns [`SafeError::Integrity`] on mismatch.
    pub fn verify(self, stored: &[u8; TAG_LENGTH]) -> Result<()> {
        self.0.verify_slice(stored).map_err(|_| SafeError::Integrity)
    }
}

/// Compute the tag over a sequence of field values
pub fn compute_tag<'a, I>(key: &SecretKey, values: I) -> Result<[u8; TAG_LENGTH]>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut mac = IntegrityMac::new(key)?;
    for value in values {
        mac.update(value);
    }
    Ok(mac.finalize())
}
