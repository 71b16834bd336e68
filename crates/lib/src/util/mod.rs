//! Shared test helpers.

#[cfg(test)]
pub mod testutil;
