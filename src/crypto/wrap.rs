//! Wrapping of the data keys under the stretched key
//!
//! The 64-byte blob is four independent Twofish blocks (no chaining):
//! blocks 0-1 hold the encryption key, blocks 2-3 the authentication key.

use twofish::Twofish;
use twofish::cipher::generic_array::GenericArray;
use twofish::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use zeroize::{Zeroize, Zeroizing};

use super::secret::SecretKey;
use crate::error::{Result, SafeError};
use crate::{BLOCK_SIZE, KEY_LENGTH, WRAPPED_KEYS_LENGTH};

fn block_cipher(key: &SecretKey) -> Result<Twofish> {
    Twofish::new_from_slice(key.as_bytes())
        .map_err(|_| SafeError::format("invalid Twofish key length"))
}

/// Recover the encryption and authentication keys from the wrapped blob
pub fn unwrap_keys(
    stretched: &SecretKey,
    blob: &[u8; WRAPPED_KEYS_LENGTH],
) -> Result<(SecretKey, SecretKey)> {
    let cipher = block_cipher(stretched)?;

    let mut plain = Zeroizing::new(*blob);
    for block in plain.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }

    let mut half = [0u8; KEY_LENGTH];
    half.copy_from_slice(&plain[..KEY_LENGTH]);
    let encryption = SecretKey::from_bytes(half);
    half.copy_from_slice(&plain[KEY_LENGTH..]);
    let authentication = SecretKey::from_bytes(half);
    half.zeroize();

    Ok((encryption, authentication))
}

/// Wrap the encryption and authentication keys for storage
pub fn wrap_keys(
    stretched: &SecretKey,
    encryption: &SecretKey,
    authentication: &SecretKey,
) -> Result<[u8; WRAPPED_KEYS_LENGTH]> {
    let cipher = block_cipher(stretched)?;

    let mut blob = [0u8; WRAPPED_KEYS_LENGTH];
    blob[..KEY_LENGTH].copy_from_slice(encryption.as_bytes());
    blob[KEY_LENGTH..].copy_from_slice(authentication.as_bytes());
    for block in blob.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }

    Ok(blob)
}
