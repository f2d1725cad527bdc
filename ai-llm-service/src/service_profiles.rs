//! Shared LLM service with two profiles: `fast` and `slow`.
//!
//! - Construct once at startup, wrap in `Arc`, share with handlers.
//! - HTTP clients are built eagerly so configuration errors surface at boot.
//! - Without a slow profile, slow calls go to the fast one.

use tracing::info;

use crate::{
    config::{default_config, llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::Result,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

enum ProfileClient {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl ProfileClient {
    fn build(cfg: &LlmModelConfig) -> Result<Self> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => ProfileClient::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => ProfileClient::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        match self {
            ProfileClient::Ollama(c) => c.generate(prompt, system).await,
            ProfileClient::OpenAI(c) => c.generate(prompt, system).await,
        }
    }
}

pub struct LlmServiceProfiles {
    fast_cfg: LlmModelConfig,
    slow_cfg: Option<LlmModelConfig>,
    fast: ProfileClient,
    slow: Option<ProfileClient>,
}

impl LlmServiceProfiles {
    /// # Errors
    /// [`crate::AiLlmError`] if a client cannot be built from its config.
    pub fn new(fast: LlmModelConfig, slow: Option<LlmModelConfig>) -> Result<Self> {
        let slow = slow.filter(|s| *s != fast);
        let fast_client = ProfileClient::build(&fast)?;
        let slow_client = slow.as_ref().map(ProfileClient::build).transpose()?;

        info!(
            provider = %fast.provider,
            fast = %fast.model,
            slow = %slow.as_ref().map_or(fast.model.as_str(), |s| s.model.as_str()),
            "LLM profiles ready"
        );

        Ok(Self {
            fast_cfg: fast,
            slow_cfg: slow,
            fast: fast_client,
            slow: slow_client,
        })
    }

    /// Builds both profiles from the environment, see [`default_config`].
    ///
    /// # Errors
    /// Configuration or client construction errors.
    pub fn from_env() -> Result<Self> {
        let (fast, slow) = default_config::profiles_from_env()?;
        Self::new(fast, slow)
    }

    /// # Errors
    /// Transport or provider errors from the fast model.
    pub async fn generate_fast(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        self.fast.generate(prompt, system).await
    }

    /// # Errors
    /// Transport or provider errors from the slow (or fallback fast) model.
    pub async fn generate_slow(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        self.slow
            .as_ref()
            .unwrap_or(&self.fast)
            .generate(prompt, system)
            .await
    }

    /// `(fast, slow)`; slow is the fast config when none was given.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.fast_cfg, self.slow_cfg.as_ref().unwrap_or(&self.fast_cfg))
    }
}
