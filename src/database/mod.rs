//! In-memory database and its query/mutation surface
//!
//! - [`Database`] owns the decoded header, records and key material
//! - [`PasswordSafe`] is the read interface front-ends consume
//! - [`file`] opens and saves containers on disk

pub mod db;
pub mod file;
pub mod models;
pub mod safe;

pub use db::Database;
pub use models::*;
pub use safe::PasswordSafe;
