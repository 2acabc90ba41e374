//! ContourKit Settings Crate
//!
//! Handles configuration loading, saving and validation.

pub mod config;
pub mod error;

pub use config::{Config, FileSettings};
pub use error::{SettingsError, SettingsResult};
