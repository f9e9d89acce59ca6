//! Cryptographic operations for Password Safe v3 containers
//!
//! - SHA-256 key stretching and password verification
//! - Twofish block-local wrapping of the data keys
//! - Twofish-CBC bulk encryption of the field stream
//! - HMAC-SHA-256 integrity tag over plaintext field values
//!
//! All key material is held in [`SecretKey`] values that zero themselves on drop.

mod integrity;
mod key;
mod secret;
mod transport;
mod wrap;

pub use integrity::{compute_tag, IntegrityMac};
pub use key::{stretch_key, verification_hash, verify_password};
pub use secret::{KeySet, SecretKey};
pub use transport::{decrypt, encrypt};
pub use wrap::{unwrap_keys, wrap_keys};
