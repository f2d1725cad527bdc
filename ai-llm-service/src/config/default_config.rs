//! Fast/slow model configs loaded from environment variables.
//!
//! - **Fast** explains single inspection terms; required.
//! - **Slow** answers questions about a whole report; optional, falls back to fast.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = `ollama` (default) or `openai`
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL_FAST`           = fast model (falls back to `OLLAMA_MODEL`)
//! - `OLLAMA_MODEL`                = slow model
//!
//! OpenAI-compatible:
//! - `OPENAI_URL`        = endpoint (default `https://api.openai.com`)
//! - `OPENAI_API_KEY`    = key (mandatory)
//! - `OPENAI_MODEL_FAST` = fast model (falls back to `OPENAI_MODEL`)
//! - `OPENAI_MODEL`      = slow model

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        ConfigError, Result, env_opt, parse_opt_u32, parse_opt_u64, require,
        validate_http_endpoint,
    },
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const FAST_TIMEOUT_SECS: u64 = 60;
const SLOW_TIMEOUT_SECS: u64 = 180;

/// Variable lookup; blank values must already be mapped to `None`.
pub type Lookup<'a> = &'a dyn Fn(&'static str) -> Option<String>;

/// Reads `(fast, slow)` from the process environment.
///
/// # Errors
/// Any [`ConfigError`] for missing or malformed variables.
pub fn profiles_from_env() -> Result<(LlmModelConfig, Option<LlmModelConfig>)> {
    profiles_from(&env_opt)
}

/// Same as [`profiles_from_env`] with an explicit lookup.
///
/// # Errors
/// Any [`ConfigError`] for missing or malformed variables.
pub fn profiles_from(get: Lookup<'_>) -> Result<(LlmModelConfig, Option<LlmModelConfig>)> {
    let provider = match get("LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Ollama,
    };
    let common = Common {
        max_tokens: parse_opt_u32("LLM_MAX_TOKENS", get("LLM_MAX_TOKENS"))?,
        timeout_secs: parse_opt_u64("LLM_TIMEOUT_SECS", get("LLM_TIMEOUT_SECS"))?,
    };

    match provider {
        LlmProvider::Ollama => ollama_profiles(get, &common),
        LlmProvider::OpenAI => openai_profiles(get, &common),
    }
}

struct Common {
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

/// `OLLAMA_URL` wins over `OLLAMA_PORT` (→ `http://localhost:{port}`).
fn ollama_endpoint(get: Lookup<'_>) -> Result<String> {
    if let Some(url) = get("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = get("OLLAMA_PORT") {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn ollama_profiles(
    get: Lookup<'_>,
    common: &Common,
) -> Result<(LlmModelConfig, Option<LlmModelConfig>)> {
    let endpoint = ollama_endpoint(get)?;
    let slow_model = get("OLLAMA_MODEL");
    let fast_model = require(
        "OLLAMA_MODEL_FAST or OLLAMA_MODEL",
        get("OLLAMA_MODEL_FAST").or_else(|| slow_model.clone()),
    )?;

    let fast = LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: fast_model,
        endpoint: endpoint.clone(),
        api_key: None,
        max_tokens: common.max_tokens,
        temperature: Some(0.3),
        top_p: Some(0.9),
        timeout_secs: Some(common.timeout_secs.unwrap_or(FAST_TIMEOUT_SECS)),
    };
    let slow = slow_model.map(|model| LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: common.max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(common.timeout_secs.unwrap_or(SLOW_TIMEOUT_SECS)),
    });
    Ok((fast, slow))
}

fn openai_profiles(
    get: Lookup<'_>,
    common: &Common,
) -> Result<(LlmModelConfig, Option<LlmModelConfig>)> {
    let endpoint = get("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
    validate_http_endpoint("OPENAI_URL", &endpoint)?;
    let api_key = require("OPENAI_API_KEY", get("OPENAI_API_KEY"))?;
    let slow_model = get("OPENAI_MODEL");
    let fast_model = require(
        "OPENAI_MODEL_FAST or OPENAI_MODEL",
        get("OPENAI_MODEL_FAST").or_else(|| slow_model.clone()),
    )?;

    let fast = LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: fast_model,
        endpoint: endpoint.clone(),
        api_key: Some(api_key.clone()),
        max_tokens: common.max_tokens,
        temperature: Some(0.3),
        top_p: None,
        timeout_secs: Some(common.timeout_secs.unwrap_or(FAST_TIMEOUT_SECS)),
    };
    let slow = slow_model.map(|model| LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: common.max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(common.timeout_secs.unwrap_or(SLOW_TIMEOUT_SECS)),
    });
    Ok((fast, slow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;
    use std::collections::HashMap;

    fn vars(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn ollama_port_and_single_model() {
        let get = vars(&[("OLLAMA_PORT", "11434"), ("OLLAMA_MODEL", "qwen3:14b")]);
        let (fast, slow) = profiles_from(&get).expect("config");
        assert_eq!(fast.endpoint, "http://localhost:11434");
        assert_eq!(fast.model, "qwen3:14b");
        assert_eq!(slow.map(|s| s.model).as_deref(), Some("qwen3:14b"));
    }

    #[test]
    fn fast_only_leaves_slow_unset() {
        let get = vars(&[
            ("OLLAMA_URL", "http://ollama:11434"),
            ("OLLAMA_MODEL_FAST", "gemma3:4b"),
            ("LLM_TIMEOUT_SECS", "15"),
        ]);
        let (fast, slow) = profiles_from(&get).expect("config");
        assert_eq!(fast.model, "gemma3:4b");
        assert_eq!(fast.timeout_secs, Some(15));
        assert!(slow.is_none());
    }

    #[test]
    fn openai_requires_key() {
        let get = vars(&[("LLM_KIND", "openai"), ("OPENAI_MODEL", "gpt-4o-mini")]);
        assert!(matches!(
            profiles_from(&get),
            Err(AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY")))
        ));

        let get = vars(&[
            ("LLM_KIND", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ]);
        let (fast, _) = profiles_from(&get).expect("config");
        assert_eq!(fast.endpoint, DEFAULT_OPENAI_URL);
        assert_eq!(fast.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn missing_endpoint_and_bad_kind_are_reported() {
        let get = vars(&[("OLLAMA_MODEL", "m")]);
        assert!(matches!(
            profiles_from(&get),
            Err(AiLlmError::Config(ConfigError::MissingVar(_)))
        ));

        let get = vars(&[("LLM_KIND", "gemini")]);
        assert!(matches!(
            profiles_from(&get),
            Err(AiLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));
    }
}
