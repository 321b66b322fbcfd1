//! Parsing and validation of `aiport.toml` logging configuration.
//!
//! This crate reads the logging section of a host's configuration and turns
//! it into a ready [`DiagnosticBus`](aiport_log::DiagnosticBus) with the
//! declared default streams attached.

#![warn(missing_docs)]

pub mod build;
pub mod error;
pub mod loader;
pub mod types;

pub use build::build_bus;
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
