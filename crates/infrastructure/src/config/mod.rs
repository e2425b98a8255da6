//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `storage`: Object storage for published audio
//! - `synthesis`: Local fallback for inline synthesis results
//!
//! Generation and speech settings reuse the `ai_core` and `ai_speech`
//! config types directly.

mod server;
mod storage;
mod synthesis;

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use config::builder::{ConfigBuilder, DefaultState};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validation::{ConfigValidator, ConfigWarning};

pub use server::ServerConfig;
pub use storage::{StorageConfig, oss_region_of};
pub use synthesis::SynthesisAppConfig;

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "COMPANION";

/// Separator between nested keys in environment variables
pub const ENV_SEPARATOR: &str = "__";

/// Vendor variable carrying the DashScope API key
pub const DASHSCOPE_API_KEY_VAR: &str = "DASHSCOPE_API_KEY";

/// Vendor variable carrying the OSS access key id
pub const ACCESS_KEY_ID_VAR: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";

/// Vendor variable carrying the OSS access key secret
pub const ACCESS_KEY_SECRET_VAR: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";

/// DashScope account settings shared by generation and speech
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DashScopeConfig {
    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for DashScopeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashScopeConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .finish()
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// DashScope credentials
    #[serde(default)]
    pub dashscope: DashScopeConfig,

    /// Object storage for uploaded audio
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reply generation
    #[serde(default)]
    pub generation: InferenceConfig,

    /// Speech recognition and synthesis
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Inline synthesis fallback
    #[serde(default)]
    pub synthesis: SynthesisAppConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Sources, later ones winning: built-in defaults, an optional
    /// `config.{toml,yaml,json}` in the working directory, `COMPANION__*`
    /// variables, and finally the vendor credential variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = Self::builder_with_defaults()?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., COMPANION__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_vendor_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Build configuration from a TOML document on top of the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        Self::builder_with_defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)
    }

    /// Fill secret slots from the well-known vendor variables
    ///
    /// Blank values are ignored so an empty line in `.env` does not wipe out
    /// a key set elsewhere.
    pub fn apply_vendor_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(val) = read(DASHSCOPE_API_KEY_VAR) {
            self.dashscope.api_key = Some(SecretString::from(val));
            debug!("Loaded dashscope.api_key from {DASHSCOPE_API_KEY_VAR}");
        }
        if let Some(val) = read(ACCESS_KEY_ID_VAR) {
            self.storage.access_key_id = Some(SecretString::from(val));
            debug!("Loaded storage.access_key_id from {ACCESS_KEY_ID_VAR}");
        }
        if let Some(val) = read(ACCESS_KEY_SECRET_VAR) {
            self.storage.access_key_secret = Some(SecretString::from(val));
            debug!("Loaded storage.access_key_secret from {ACCESS_KEY_SECRET_VAR}");
        }
    }

    /// Check that the service can start
    ///
    /// # Errors
    ///
    /// Returns every critical finding joined into one message.
    pub fn validate(&self) -> Result<(), String> {
        let critical: Vec<String> = ConfigValidator::validate(self)
            .into_iter()
            .filter(ConfigWarning::is_critical)
            .map(|w| w.to_string())
            .collect();

        if critical.is_empty() {
            Ok(())
        } else {
            Err(critical.join("; "))
        }
    }

    /// Non-fatal findings worth logging at startup
    pub fn endpoint_warnings(&self) -> Vec<ConfigWarning> {
        ConfigValidator::validate(self)
            .into_iter()
            .filter(|w| !w.is_critical())
            .collect()
    }
}
