//! Client configuration loaded from environment variables.
//!
//! # Environment variables
//! - `REPORT_API_URL`          = backend base URL (default `http://localhost:5000`)
//! - `REPORT_API_TIMEOUT_SECS` = per-request timeout (default 30)

use crate::error_handler::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the Q&A backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CollaboratorConfig {
    /// Builds a config for `base_url`, validating the scheme.
    ///
    /// # Errors
    /// [`ConfigError::InvalidFormat`] if the URL is not http/https.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let base = base_url.trim();
        validate_http_endpoint("REPORT_API_URL", base)?;
        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// Reads the config from the environment, falling back to defaults for
    /// unset variables.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] for a malformed `REPORT_API_URL`
    /// - [`ConfigError::InvalidNumber`] for a malformed timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = env_opt("REPORT_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = env_opt_u64("REPORT_API_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(&base, timeout)
    }

    pub fn explain_url(&self) -> String {
        format!("{}/api/explain-term", self.base_url)
    }

    pub fn ask_url(&self) -> String {
        format!("{}/api/ask-report", self.base_url)
    }
}

fn env_opt(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_opt_u64(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env_opt(name) {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            }),
        None => Ok(None),
    }
}

fn validate_http_endpoint(var: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        })
    }
}
