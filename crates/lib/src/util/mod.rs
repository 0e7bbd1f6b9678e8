//! Shared utilities.
//!
//! Path segment encoding and test helpers.

pub mod encode;

#[cfg(test)]
pub mod testutil;
