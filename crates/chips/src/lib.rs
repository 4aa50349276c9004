//! Chips - toolbar status chips from the command line
//!
//! This crate wraps the `status_chips` engine with:
//! - Layered configuration via figment
//! - Registry snapshot loading (JSON/TOML) and file watching
//! - Presentation adapters writing chip lists to stdout or the log

// Re-export the engine
pub use status_chips;

pub mod config;
pub mod present;
pub mod snapshot;
pub mod types;

pub use types::{Error, Result};
