//! # pwsafe-core
//!
//! A Password Safe v3 database engine.
//!
//! ## Features
//!
//! - SHA-256 key stretching with a configurable work factor
//! - Twofish key wrapping and Twofish-CBC bulk encryption
//! - Length-prefixed, block-aligned field framing for headers and records
//! - HMAC-SHA-256 integrity verification on every open
//! - Secret key material zeroed on drop
//!
//! ## Example
//!
//! ```no_run
//! use pwsafe_core::{PasswordSafe, database::file};
//! use std::path::Path;
//!
//! let db = file::open(Path::new("/path/to/safe.psafe3"), "my_password").unwrap();
//!
//! for group in db.groups() {
//!     for title in db.list_by_group(&group) {
//!         println!("{}: {}", group, title);
//!     }
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod format;
pub mod utils;

// Re-export main types
pub use config::SafeOptions;
pub use database::{Database, Header, PasswordSafe, Record};
pub use error::{Result, SafeError};
pub use format::{ContainerFormat, V3Format};

/// Magic tag at the start of every v3 container
pub const MAGIC_V3: &[u8; 4] = b"PWS3";

/// Unencrypted marker that closes the ciphertext region
pub const EOF_MARKER: &[u8; BLOCK_SIZE] = b"PWS3-EOFPWS3-EOF";

/// Cipher block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Salt length
pub const SALT_LENGTH: usize = 32;

/// Length of every derived or wrapped key
pub const KEY_LENGTH: usize = 32;

/// Length of the wrapped key blob (encryption key + authentication key)
pub const WRAPPED_KEYS_LENGTH: usize = 2 * KEY_LENGTH;

/// Initialization vector length
pub const IV_LENGTH: usize = BLOCK_SIZE;

/// Integrity tag length
pub const TAG_LENGTH: usize = 32;

/// UUID field length
pub const UUID_LENGTH: usize = 16;

/// Default key-stretching iteration count for new databases
pub const DEFAULT_ITERATIONS: u32 = 2048;

/// Minimum accepted iteration count
pub const MIN_ITERATIONS: u32 = 1;

/// Format version written to new headers (minor 0x0d, major 0x03, little-endian)
pub const FORMAT_VERSION: &str = "\u{0d}\u{03}";
