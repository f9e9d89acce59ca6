//! Random value generation

use rand::RngCore;

use crate::{IV_LENGTH, SALT_LENGTH};

/// Fill an array of `N` bytes from the thread-local CSPRNG
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate a key-stretching salt (32 bytes)
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    random_bytes()
}

/// Generate a CBC initialization vector (16 bytes)
pub fn generate_iv() -> [u8; IV_LENGTH] {
    random_bytes()
}
