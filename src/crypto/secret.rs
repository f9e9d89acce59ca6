//! Secret key material
//!
//! Every key this crate derives or unwraps lives in a [`SecretKey`], which
//! zeroes its bytes when dropped, on success and error paths alike.

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::KEY_LENGTH;

/// A 256-bit key, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LENGTH]);

impl SecretKey {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random key
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        rand::rng().fill_bytes(&mut bytes);
        let key = Self(bytes);
        bytes.zeroize();
        key
    }

    /// Raw key bytes
    ///
    /// Use only for immediate cryptographic operations; never store or log.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// The three keys an unlocked database holds
///
/// - `stretched`: derived from the password, wraps the other two
/// - `encryption`: Twofish-CBC key for the field stream
/// - `authentication`: HMAC key for the integrity tag
#[derive(Clone, Debug)]
pub struct KeySet {
    pub stretched: SecretKey,
    pub encryption: SecretKey,
    pub authentication: SecretKey,
}

impl KeySet {
    /// Fresh random data keys under an existing stretched key
    pub fn generate(stretched: SecretKey) -> Self {
        Self {
            stretched,
            encryption: SecretKey::random(),
            authentication: SecretKey::random(),
        }
    }
}
