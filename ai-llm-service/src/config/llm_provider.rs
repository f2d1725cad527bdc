use std::fmt;
use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Backend used for inference.
///
/// Parsed from `LLM_KIND`; `chatgpt` is accepted as an alias of `openai`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI or any server speaking `/v1/chat/completions`.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::OpenAI => "openai",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds_case_insensitively() {
        assert_eq!("Ollama".parse::<LlmProvider>().ok(), Some(LlmProvider::Ollama));
        assert_eq!(" chatgpt ".parse::<LlmProvider>().ok(), Some(LlmProvider::OpenAI));
        assert!(matches!(
            "gemini".parse::<LlmProvider>(),
            Err(ConfigError::UnsupportedProvider(k)) if k == "gemini"
        ));
    }
}
