//! Configuration validation module
//!
//! Startup checks for application configuration.

pub mod startup;

pub use startup::{ConfigValidator, ConfigWarning, WarningSeverity};
