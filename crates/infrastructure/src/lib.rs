//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the object storage publisher, DashScope adapters and
//! configuration loading.

pub mod adapters;
pub mod config;
pub mod validation;

pub use adapters::*;
pub use config::{
    AppConfig, DashScopeConfig, ServerConfig, StorageConfig, SynthesisAppConfig,
};
pub use validation::{ConfigValidator, ConfigWarning, WarningSeverity};
