//! Data models for decoded safe content

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

/// Database-level attributes stored in the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Format version as stored (two raw bytes, minor then major)
    pub version: String,
    /// Database identifier
    pub uuid: Uuid,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: crate::FORMAT_VERSION.to_string(),
            uuid: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
        }
    }
}

/// One credential entry
///
/// The title is the key the database stores the record under.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier (16 raw bytes)
    pub uuid: Uuid,
    pub group: String,
    pub title: String,
    pub username: String,
    pub password: String,
    pub notes: String,
    pub url: String,
}

impl Record {
    /// New record with a fresh UUID
    pub fn new(title: &str, password: &str) -> Self {
        let mut record = Self::default();
        record.uuid = Uuid::new_v4();
        record.title = title.to_string();
        record.password = password.to_string();
        record
    }

    /// Set the group (builder style)
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    /// Set the username (builder style)
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    /// Set the notes (builder style)
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    /// Set the URL (builder style)
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("uuid", &self.uuid)
            .field("group", &self.group)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        self.password.zeroize();
        self.notes.zeroize();
    }
}

/// Titles in one group that matched a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Group name (empty for ungrouped records)
    pub group: String,
    /// Matching titles, sorted
    pub titles: Vec<String>,
}
