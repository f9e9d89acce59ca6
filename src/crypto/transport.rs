//! Twofish-CBC encryption and decryption of the field stream
//!
//! The field codec already pads every field to the block size, so the
//! cipher runs without padding and rejects any input that is not a whole
//! number of 16-byte blocks.

use block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use twofish::Twofish;
use zeroize::Zeroizing;

use super::secret::SecretKey;
use crate::error::{Result, SafeError};
use crate::{BLOCK_SIZE, IV_LENGTH};

type TwofishCbcEnc = cbc::Encryptor<Twofish>;
type TwofishCbcDec = cbc::Decryptor<Twofish>;

fn check_aligned(len: usize) -> Result<()> {
    if len % BLOCK_SIZE != 0 {
        return Err(SafeError::format(format!(
            "data length {} is not a multiple of the block size",
            len
        )));
    }
    Ok(())
}

/// Encrypt block-aligned plaintext using Twofish-CBC
pub fn encrypt(key: &SecretKey, iv: &[u8; IV_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>> {
    check_aligned(plaintext.len())?;

    let mut buffer = plaintext.to_vec();
    let encryptor = TwofishCbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| SafeError::format("invalid encryption key or IV length"))?;

    encryptor
        .encrypt_padded_mut::<NoPadding>(&mut buffer, plaintext.len())
        .map_err(|_| SafeError::format("encryption failed"))?;

    Ok(buffer)
}

/// Decrypt block-aligned ciphertext using Twofish-CBC
///
/// The plaintext is returned in a buffer that is zeroed on drop.
pub fn decrypt(
    key: &SecretKey,
    iv: &[u8; IV_LENGTH],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    check_aligned(ciphertext.len())?;

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    if buffer.is_empty() {
        return Ok(buffer);
    }

    let decryptor = TwofishCbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| SafeError::format("invalid encryption key or IV length"))?;

    let len = decryptor
        .decrypt_padded_mut::<NoPadding>(&mut buffer[..])
        .map_err(|_| SafeError::format("decryption failed"))?
        .len();
    buffer.truncate(len);

    Ok(buffer)
}
