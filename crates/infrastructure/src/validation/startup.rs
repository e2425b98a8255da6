//! Startup validation for application configuration
//!
//! Missing credentials are critical and abort startup. Everything else is
//! reported so operators can see it in the first lines of the log.

use std::fmt;

use crate::config::{
    ACCESS_KEY_ID_VAR, ACCESS_KEY_SECRET_VAR, AppConfig, DASHSCOPE_API_KEY_VAR,
};

/// Severity level for configuration findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningSeverity {
    /// Informational - no action required
    Info,
    /// Warning - should be addressed but not fatal
    Warning,
    /// Critical - the service cannot start
    Critical,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A configuration finding with severity and description
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// Severity level of the finding
    pub severity: WarningSeverity,
    /// Short code identifying the finding
    pub code: String,
    /// Human-readable description of the issue
    pub message: String,
    /// Recommended action to resolve the issue
    pub recommendation: String,
}

impl ConfigWarning {
    /// Create a new finding
    #[must_use]
    pub fn new(
        severity: WarningSeverity,
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    #[must_use]
    pub fn critical(
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(WarningSeverity::Critical, code, message, recommendation)
    }

    #[must_use]
    pub fn warning(
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(WarningSeverity::Warning, code, message, recommendation)
    }

    #[must_use]
    pub fn info(
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(WarningSeverity::Info, code, message, recommendation)
    }

    /// Check if this finding is critical
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.severity, WarningSeverity::Critical)
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} - {}",
            self.severity, self.code, self.message, self.recommendation
        )
    }
}

/// Routes the HTTP server owns; the synthesis fallback may not shadow them
pub const RESERVED_ROUTES: [&str; 4] = ["/", "/chat", "/health", "/metrics"];

/// Validates application configuration before the server starts
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and return all findings
    ///
    /// Returns a list sorted by severity (critical first).
    #[must_use]
    pub fn validate(config: &AppConfig) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if config.dashscope.api_key.is_none() {
            warnings.push(ConfigWarning::critical(
                "DASHSCOPE_KEY_MISSING",
                "No DashScope API key configured",
                format!("Set {DASHSCOPE_API_KEY_VAR} or dashscope.api_key"),
            ));
        }

        if !config.storage.has_credentials() {
            warnings.push(ConfigWarning::critical(
                "STORAGE_CREDENTIALS_MISSING",
                "Object storage access key pair is incomplete",
                format!("Set {ACCESS_KEY_ID_VAR} and {ACCESS_KEY_SECRET_VAR}"),
            ));
        }

        if config.storage.bucket.trim().is_empty() {
            warnings.push(ConfigWarning::critical(
                "STORAGE_BUCKET_EMPTY",
                "storage.bucket is empty",
                "Name the bucket uploaded audio is published to",
            ));
        }

        if let Err(e) = config.speech.validate() {
            warnings.push(ConfigWarning::critical(
                "SPEECH_CONFIG_INVALID",
                e,
                "Fix the [speech] section",
            ));
        }

        if config.generation.timeout_ms == 0 {
            warnings.push(ConfigWarning::critical(
                "GENERATION_TIMEOUT_ZERO",
                "generation.timeout_ms must be greater than 0",
                "Use the default of 30000",
            ));
        }

        if let Some((write, public)) = config.storage.region_mismatch() {
            warnings.push(ConfigWarning::warning(
                "STORAGE_REGION_MISMATCH",
                format!(
                    "Audio is written to {write} but published under {public}; \
                     recognition will fetch a URL that may not exist"
                ),
                "Point storage.write_endpoint and storage.public_base_url at the same region",
            ));
        }

        if !config.synthesis.fallback_public_path.starts_with('/') {
            warnings.push(ConfigWarning::warning(
                "FALLBACK_PATH_RELATIVE",
                format!(
                    "synthesis.fallback_public_path '{}' does not start with '/'",
                    config.synthesis.fallback_public_path
                ),
                "Use an absolute URL path such as /output.wav",
            ));
        }

        let fallback_route = format!(
            "/{}",
            config.synthesis.fallback_public_path.trim_start_matches('/')
        );
        if RESERVED_ROUTES.contains(&fallback_route.as_str()) {
            warnings.push(ConfigWarning::critical(
                "FALLBACK_PATH_RESERVED",
                format!(
                    "synthesis.fallback_public_path '{fallback_route}' collides with a built-in route"
                ),
                "Serve the fallback under its own path such as /output.wav",
            ));
        }

        if config.server.allowed_origins.is_empty() {
            warnings.push(ConfigWarning::info(
                "CORS_ANY_ORIGIN",
                "CORS allows any origin",
                "List trusted origins in server.allowed_origins",
            ));
        }

        warnings.sort_by(|a, b| b.severity.cmp(&a.severity));
        warnings
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.dashscope.api_key = Some(SecretString::from("sk-test"));
        config.storage.access_key_id = Some(SecretString::from("id"));
        config.storage.access_key_secret = Some(SecretString::from("secret"));
        config.server.allowed_origins = vec!["https://app.example".to_string()];
        config
    }

    #[test]
    fn valid_config_has_no_findings() {
        assert!(ConfigValidator::validate(&valid_config()).is_empty());
    }

    #[test]
    fn missing_credentials_are_critical_and_sorted_first() {
        let mut config = valid_config();
        config.dashscope.api_key = None;
        config.storage.access_key_secret = None;
        config.server.allowed_origins.clear();

        let warnings = ConfigValidator::validate(&config);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].is_critical());
        assert!(warnings[1].is_critical());
        assert_eq!(warnings[2].code, "CORS_ANY_ORIGIN");
    }

    #[test]
    fn region_mismatch_is_a_warning_not_fatal() {
        let mut config = valid_config();
        config.storage.public_base_url =
            Some("https://ai-lover-audio.oss-cn-beijing.aliyuncs.com".to_string());

        assert!(config.validate().is_ok());
        let warnings = config.endpoint_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "STORAGE_REGION_MISMATCH");
        assert!(warnings[0].message.contains("oss-cn-shanghai"));
        assert!(warnings[0].message.contains("oss-cn-beijing"));
    }

    #[test]
    fn invalid_speech_config_is_critical() {
        let mut config = valid_config();
        config.speech.timeout_ms = 0;
        assert!(config.validate().unwrap_err().contains("SPEECH_CONFIG_INVALID"));
    }

    #[test]
    fn fallback_path_on_a_builtin_route_is_critical() {
        for path in ["/", "", "/chat", "chat", "/health", "//metrics"] {
            let mut config = valid_config();
            config.synthesis.fallback_public_path = path.to_string();

            let problems = config.validate().unwrap_err();
            assert!(problems.contains("FALLBACK_PATH_RESERVED"), "{path}: {problems}");
        }
    }

    #[test]
    fn default_fallback_path_is_not_reserved() {
        let config = valid_config();
        assert!(
            !ConfigValidator::validate(&config)
                .iter()
                .any(|w| w.code == "FALLBACK_PATH_RESERVED")
        );
    }

    #[test]
    fn display_format() {
        let w = ConfigWarning::warning("CODE", "msg", "fix it");
        assert_eq!(w.to_string(), "[WARNING] CODE: msg - fix it");
    }
}
