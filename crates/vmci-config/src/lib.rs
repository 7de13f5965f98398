//! Read-only runtime configuration store for the vmci compiler backend.
//!
//! The host runtime publishes a flat table of named constants: detected
//! CPU capabilities and boolean tuning switches. This crate models that
//! table and loads it from TOML files for standalone use.
//!
//! Lookups are by exact name. A missing name is a valid outcome and is
//! never reported as an error.

pub mod error;
pub mod parse;
pub mod store;

pub use error::{ConfigError, Result};
pub use parse::{load_store_toml, parse_store_toml, store_to_toml};
pub use store::{ConfigStore, ConfigValue, MemoryConfigStore};
