//! Unified error handling for `ai-llm-service`.
//!
//! A single top-level [`AiLlmError`] wraps configuration errors (startup) and
//! provider errors (per request). Small env/parse helpers return the unified
//! [`Result<T>`] alias.
//!
//! All messages carry the `[AI LLM Service]` marker to simplify attribution in logs.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A provider rejected the request or answered with something unusable.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Connection, timeout or body-read failure.
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g. a URL without a scheme).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-2xx response details.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    /// Short single-line excerpt of the body.
    pub snippet: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    #[error("config is for a different provider")]
    InvalidProvider,

    #[error("missing API key")]
    MissingApiKey,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("{0}")]
    HttpStatus(HttpError),

    #[error("decode error: {0}")]
    Decode(String),

    /// The model answered with no text at all.
    #[error("empty completion")]
    EmptyCompletion,
}

#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads an environment variable; blank counts as unset.
pub fn env_opt(name: &'static str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Requires a variable that was looked up elsewhere.
///
/// # Errors
/// [`ConfigError::MissingVar`] if `value` is `None`.
pub fn require(name: &'static str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| ConfigError::MissingVar(name).into())
}

/// Parses an optional `u32` (`Ok(None)` if unset).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if set but not a `u32`.
pub fn parse_opt_u32(name: &'static str, value: Option<String>) -> Result<Option<u32>> {
    value
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                AiLlmError::from(ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected u32",
                })
            })
        })
        .transpose()
}

/// Parses an optional `u64` (`Ok(None)` if unset).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if set but not a `u64`.
pub fn parse_opt_u64(name: &'static str, value: Option<String>) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                AiLlmError::from(ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected u64",
                })
            })
        })
        .transpose()
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// [`ConfigError::InvalidFormat`] otherwise.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Returns a short, single-line snippet of a response body for diagnostics.
pub fn make_snippet(body: &str) -> String {
    body.chars()
        .take(240)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let body = format!("line1\nline2\t{}", "x".repeat(500));
        let s = make_snippet(&body);
        assert!(!s.contains('\n'));
        assert!(s.starts_with("line1 line2"));
        assert_eq!(s.chars().count(), 240);
    }

    #[test]
    fn endpoint_scheme_is_validated() {
        assert!(validate_http_endpoint("OLLAMA_URL", "http://localhost:11434").is_ok());
        assert!(matches!(
            validate_http_endpoint("OLLAMA_URL", "localhost:11434"),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { var: "OLLAMA_URL", .. }))
        ));
    }

    #[test]
    fn numbers_are_parsed_or_rejected() {
        assert_eq!(parse_opt_u32("LLM_MAX_TOKENS", None).ok(), Some(None));
        assert_eq!(
            parse_opt_u32("LLM_MAX_TOKENS", Some("512".into())).ok(),
            Some(Some(512))
        );
        assert!(matches!(
            parse_opt_u64("LLM_TIMEOUT_SECS", Some("soon".into())),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "LLM_TIMEOUT_SECS", .. }))
        ));
        assert!(matches!(
            require("OLLAMA_MODEL", None),
            Err(AiLlmError::Config(ConfigError::MissingVar("OLLAMA_MODEL")))
        ));
    }

    #[test]
    fn provider_error_names_the_provider() {
        let e = ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::MissingApiKey);
        assert_eq!(e.to_string(), "[AI LLM Service] openai: missing API key");
    }
}
