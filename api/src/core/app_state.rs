use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;

use crate::error_handler::AppError;

/// Character budget for the report JSON embedded in a question prompt.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fast profile explains terms, slow profile answers report questions.
    pub llm: Arc<LlmServiceProfiles>,
    pub max_context_chars: usize,
}

impl AppState {
    pub fn new(llm: Arc<LlmServiceProfiles>, max_context_chars: usize) -> Self {
        Self {
            llm,
            max_context_chars,
        }
    }

    /// Loads LLM profiles and limits from environment variables.
    ///
    /// # Errors
    /// [`AppError::Llm`] for LLM configuration problems, [`AppError::Config`]
    /// for a malformed `REPORT_MAX_CONTEXT_CHARS`.
    pub fn from_env() -> Result<Self, AppError> {
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let raw = std::env::var("REPORT_MAX_CONTEXT_CHARS").ok();
        let max_context_chars = parse_max_context_chars(raw.as_deref())?;
        Ok(Self::new(llm, max_context_chars))
    }
}

/// Unset or blank falls back to [`DEFAULT_MAX_CONTEXT_CHARS`]; zero is rejected.
fn parse_max_context_chars(raw: Option<&str>) -> Result<usize, AppError> {
    let Some(v) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_MAX_CONTEXT_CHARS);
    };
    match v.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Config(
            "REPORT_MAX_CONTEXT_CHARS must be a positive integer".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_budget_defaults_when_unset_or_blank() {
        assert_eq!(parse_max_context_chars(None).ok(), Some(DEFAULT_MAX_CONTEXT_CHARS));
        assert_eq!(parse_max_context_chars(Some("  ")).ok(), Some(DEFAULT_MAX_CONTEXT_CHARS));
        assert_eq!(parse_max_context_chars(Some(" 4000 ")).ok(), Some(4000));
    }

    #[test]
    fn context_budget_must_be_positive() {
        for raw in ["0", "-5", "many"] {
            assert!(
                matches!(parse_max_context_chars(Some(raw)), Err(AppError::Config(_))),
                "{raw} should be rejected"
            );
        }
    }
}
