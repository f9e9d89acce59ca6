//! Engine options
//!
//! Tunables for creating and decoding databases. Loading these from disk or
//! the environment is the caller's job; this module only parses and validates.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SafeError};
use crate::{DEFAULT_ITERATIONS, MIN_ITERATIONS};

/// Options consumed by [`crate::Database`] creation and decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeOptions {
    /// Key-stretching iteration count for newly created databases
    pub default_iterations: u32,
    /// Reject records missing a UUID, title or password
    pub require_mandatory_fields: bool,
}

impl Default for SafeOptions {
    fn default() -> Self {
        Self {
            default_iterations: DEFAULT_ITERATIONS,
            require_mandatory_fields: false,
        }
    }
}

impl SafeOptions {
    /// Parse options from a JSON document, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: SafeOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize options to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check option values are usable
    pub fn validate(&self) -> Result<()> {
        if self.default_iterations < MIN_ITERATIONS {
            return Err(SafeError::Config(format!(
                "default_iterations must be at least {}",
                MIN_ITERATIONS
            )));
        }
        Ok(())
    }
}
