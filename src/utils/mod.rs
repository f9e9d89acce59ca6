//! Utility functions

pub mod random;

pub use random::*;
