//! Unlocked password database
//!
//! A [`Database`] is what a successful decode produces: the header, the
//! records keyed by title, and the key material needed to encode it again.
//! New databases start empty with fresh random keys.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{Header, Record};
use super::safe::PasswordSafe;
use crate::config::SafeOptions;
use crate::crypto::{stretch_key, verification_hash, verify_password, KeySet};
use crate::error::{Result, SafeError};
use crate::format::{self, ContainerFormat, V3Format};
use crate::utils::{generate_iv, generate_salt};
use crate::{IV_LENGTH, MIN_ITERATIONS, SALT_LENGTH, TAG_LENGTH};

/// An unlocked password database
pub struct Database {
    /// Container format used to encode this database
    pub(crate) format: &'static dyn ContainerFormat,
    pub(crate) salt: [u8; SALT_LENGTH],
    /// Key-stretching iteration count
    pub(crate) iterations: u32,
    pub(crate) keys: KeySet,
    /// IV used by the last decode or encode
    pub(crate) iv: [u8; IV_LENGTH],
    pub(crate) header: Header,
    /// Tag of the last decoded or encoded container
    pub(crate) integrity_tag: [u8; TAG_LENGTH],
    /// Records keyed by title
    pub(crate) records: HashMap<String, Record>,
    /// Where the database was opened from or last saved to
    pub(crate) save_path: Option<PathBuf>,
}

impl Database {
    /// Create an empty database protected by `password`
    ///
    /// Uses a random salt and the configured iteration count.
    pub fn new(password: &str, options: &SafeOptions) -> Result<Self> {
        options.validate()?;
        Self::with_salt(password, generate_salt(), options.default_iterations)
    }

    /// Create an empty database with an explicit salt and iteration count
    pub fn with_salt(password: &str, salt: [u8; SALT_LENGTH], iterations: u32) -> Result<Self> {
        if iterations < MIN_ITERATIONS {
            return Err(SafeError::InvalidOperation(format!(
                "iteration count must be at least {}",
                MIN_ITERATIONS
            )));
        }

        debug!(iterations, "creating database");
        let stretched = stretch_key(password, &salt, iterations);

        Ok(Self {
            format: &V3Format,
            salt,
            iterations,
            keys: KeySet::generate(stretched),
            iv: generate_iv(),
            header: Header::default(),
            integrity_tag: [0u8; TAG_LENGTH],
            records: HashMap::new(),
            save_path: None,
        })
    }

    /// Decode a container with default options
    pub fn decode(bytes: &[u8], password: &str) -> Result<Self> {
        Self::decode_with(bytes, password, &SafeOptions::default())
    }

    /// Decode a container, picking the format from its magic tag
    pub fn decode_with(bytes: &[u8], password: &str, options: &SafeOptions) -> Result<Self> {
        let format = format::detect(bytes)?;
        format.decode(bytes, password, options)
    }

    /// Encode the database into container bytes
    ///
    /// Every call draws a fresh IV; it and the resulting tag are kept on
    /// the database.
    pub fn encode(&mut self) -> Result<Vec<u8>> {
        let encoded = self.format.encode(self, Utc::now())?;
        self.iv = encoded.iv;
        self.integrity_tag = encoded.integrity_tag;
        Ok(encoded.bytes)
    }

    // ========== Accessors ==========

    /// Name of the container format
    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn iv(&self) -> &[u8; IV_LENGTH] {
        &self.iv
    }

    /// Integrity tag of the last decoded or encoded container
    ///
    /// All zeroes for a database that was never encoded.
    pub fn integrity_tag(&self) -> &[u8; TAG_LENGTH] {
        &self.integrity_tag
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Raw two-byte format version
    pub fn version(&self) -> &str {
        &self.header.version
    }

    pub fn uuid(&self) -> Uuid {
        self.header.uuid
    }

    pub fn description(&self) -> &str {
        &self.header.description
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in no particular order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Check `password` against the current stretched key
    pub fn check_password(&self, password: &str) -> bool {
        let candidate = stretch_key(password, &self.salt, self.iterations);
        verify_password(&candidate, &verification_hash(&self.keys.stretched)).is_ok()
    }

    // ========== Mutations ==========

    /// Insert or replace the record stored under its title
    ///
    /// Returns the record previously stored under that title.
    pub fn set_record(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.title.clone(), record)
    }

    pub fn remove_record(&mut self, title: &str) -> Result<Record> {
        self.records
            .remove(title)
            .ok_or_else(|| SafeError::RecordNotFound(title.to_string()))
    }

    /// Move a record to a new title
    pub fn rename_record(&mut self, title: &str, new_title: &str) -> Result<()> {
        if title == new_title {
            return if self.records.contains_key(title) {
                Ok(())
            } else {
                Err(SafeError::RecordNotFound(title.to_string()))
            };
        }
        if self.records.contains_key(new_title) {
            return Err(SafeError::InvalidOperation(format!(
                "a record titled '{}' already exists",
                new_title
            )));
        }

        let mut record = self.remove_record(title)?;
        record.title = new_title.to_string();
        self.records.insert(new_title.to_string(), record);
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) {
        self.header.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.header.description = description.to_string();
    }

    /// Protect the database with a new password
    ///
    /// Draws a new salt and re-stretches; the data keys are kept, so
    /// only the preamble changes on the next encode.
    pub fn change_password(&mut self, new_password: &str) {
        self.salt = generate_salt();
        self.keys.stretched = stretch_key(new_password, &self.salt, self.iterations);
        info!("password changed");
    }

    /// Change the key-stretching work factor
    ///
    /// `password` must match the current one.
    pub fn set_iterations(&mut self, password: &str, iterations: u32) -> Result<()> {
        if iterations < MIN_ITERATIONS {
            return Err(SafeError::InvalidOperation(format!(
                "iteration count must be at least {}",
                MIN_ITERATIONS
            )));
        }
        if !self.check_password(password) {
            return Err(SafeError::Authentication);
        }

        self.iterations = iterations;
        self.keys.stretched = stretch_key(password, &self.salt, iterations);
        info!(iterations, "iteration count changed");
        Ok(())
    }
}

impl PasswordSafe for Database {
    fn list(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.records.keys().cloned().collect();
        titles.sort();
        titles
    }

    fn groups(&self) -> Vec<String> {
        self.records
            .values()
            .map(|record| record.group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn list_by_group(&self, group: &str) -> Vec<String> {
        let mut titles: Vec<String> = self
            .records
            .values()
            .filter(|record| record.group == group)
            .map(|record| record.title.clone())
            .collect();
        titles.sort();
        titles
    }

    fn get_record(&self, title: &str) -> Option<&Record> {
        self.records.get(title)
    }

    fn name(&self) -> &str {
        &self.header.name
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("format", &self.format.name())
            .field("iterations", &self.iterations)
            .field("header", &self.header)
            .field("records", &self.records.len())
            .field("save_path", &self.save_path)
            .finish_non_exhaustive()
    }
}
