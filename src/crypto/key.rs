//! Key stretching and password verification
//!
//! Implements the v3 stretching scheme:
//! 1. `X0 = SHA-256(password || salt)`
//! 2. `Xi = SHA-256(X(i-1))` for `i = 1..=iterations`
//! 3. The stretched key is `X(iterations)`
//!
//! The file stores `SHA-256(stretched key)` so a wrong password can be told
//! apart from a corrupted file.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::secret::SecretKey;
use crate::error::{Result, SafeError};
use crate::{KEY_LENGTH, SALT_LENGTH};

/// Derive the stretched key from a password
///
/// # Arguments
///
/// * `password` - The user's password (UTF-8 bytes are hashed)
/// * `salt` - The 32-byte salt stored in the container
/// * `iterations` - Number of additional SHA-256 rounds
pub fn stretch_key(password: &str, salt: &[u8; SALT_LENGTH], iterations: u32) -> SecretKey {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    let mut digest: [u8; KEY_LENGTH] = hasher.finalize().into();

    for _ in 0..iterations {
        let next: Zeroizing<[u8; KEY_LENGTH]> = Zeroizing::new(Sha256::digest(&digest).into());
        digest.copy_from_slice(&next[..]);
    }

    let key = SecretKey::from_bytes(digest);
    digest.zeroize();
    key
}

/// Hash stored in the container to verify the stretched key
pub fn verification_hash(stretched: &SecretKey) -> [u8; KEY_LENGTH] {
    Sha256::digest(stretched.as_bytes()).into()
}

/// Compare the stretched key against the stored verification hash
///
/// Returns [`SafeError::Authentication`] on mismatch.
pub fn verify_password(stretched: &SecretKey, stored: &[u8; KEY_LENGTH]) -> Result<()> {
    let computed = verification_hash(stretched);
    if bool::from(computed[..].ct_eq(&stored[..])) {
        Ok(())
    } else {
        Err(SafeError::Authentication)
    }
}
