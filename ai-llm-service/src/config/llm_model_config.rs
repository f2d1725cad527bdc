use crate::config::llm_provider::LlmProvider;

/// Everything needed to call one model.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"qwen3:14b"`, `"gpt-4o-mini"`).
    pub model: String,

    /// Base URL of the inference server, without the API path.
    pub endpoint: String,

    /// Required for OpenAI, ignored by Ollama.
    pub api_key: Option<String>,

    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,

    /// Request timeout; 60 seconds when unset.
    pub timeout_secs: Option<u64>,
}
