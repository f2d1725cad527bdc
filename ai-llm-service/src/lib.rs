//! LLM access for the inspection-report backend.
//!
//! Two logical profiles share one process-wide [`LlmServiceProfiles`]:
//! **fast** for short term explanations and **slow** for report questions.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, Result};
pub use service_profiles::LlmServiceProfiles;
