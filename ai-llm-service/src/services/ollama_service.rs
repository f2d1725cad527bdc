//! Thin Ollama client: `POST {endpoint}/api/chat` with `stream=false`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{
    AiLlmError, HttpError, ProviderError, ProviderErrorKind, Result, make_snippet,
};

pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl OllamaService {
    /// # Errors
    /// - [`ProviderErrorKind::InvalidProvider`] if `cfg.provider` is not Ollama
    /// - [`ProviderErrorKind::InvalidEndpoint`] for an endpoint without http/https
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(fail(ProviderErrorKind::InvalidProvider));
        }

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(fail(ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone())));
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let url_chat = format!("{}/api/chat", endpoint.trim_end_matches('/'));
        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Single non-streaming chat turn: optional system message, then `prompt`.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::HttpStatus`] for non-2xx responses
    /// - [`ProviderErrorKind::Decode`] if the body is not a chat response
    /// - [`ProviderErrorKind::EmptyCompletion`] for a blank answer
    /// - [`AiLlmError::HttpTransport`] for network failures
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let started = Instant::now();
        let body = ChatRequest::from_cfg(&self.cfg, prompt, system);

        debug!(prompt_len = prompt.len(), "POST {}", self.url_chat);
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            warn!(%status, %snippet, "ollama /api/chat returned non-success status");
            return Err(fail(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: self.url_chat.clone(),
                snippet,
            })));
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            fail(ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected `message.content` with stream=false"
            )))
        })?;

        let content = out
            .message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| fail(ProviderErrorKind::EmptyCompletion))?;

        debug!(latency_ms = started.elapsed().as_millis(), "chat completed");
        Ok(content)
    }
}

fn fail(kind: ProviderErrorKind) -> AiLlmError {
    ProviderError::new(LlmProvider::Ollama, kind).into()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Options::is_empty")]
    options: Options,
}

impl<'a> ChatRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(content) = system {
            messages.push(Message {
                role: "system",
                content,
            });
        }
        messages.push(Message {
            role: "user",
            content: prompt,
        });

        Self {
            model: &cfg.model,
            messages,
            stream: false,
            options: Options {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Serialize)]
struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl Options {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.num_predict.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<OutMessage>,
}

#[derive(Debug, Deserialize)]
struct OutMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: Some(256),
            temperature: Some(0.5),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    #[test]
    fn request_carries_system_then_user() {
        let c = cfg("http://localhost:11434");
        let body = serde_json::to_value(ChatRequest::from_cfg(&c, "DPF?", Some("짧게")))
            .expect("json");
        assert_eq!(
            body,
            json!({
                "model": "qwen3:14b",
                "messages": [
                    { "role": "system", "content": "짧게" },
                    { "role": "user", "content": "DPF?" }
                ],
                "stream": false,
                "options": { "temperature": 0.5, "num_predict": 256 }
            })
        );
    }

    #[test]
    fn rejects_foreign_provider_and_bad_endpoint() {
        let mut c = cfg("http://localhost:11434");
        c.provider = LlmProvider::OpenAI;
        assert!(matches!(
            OllamaService::new(c),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidProvider,
                ..
            }))
        ));
        assert!(matches!(
            OllamaService::new(cfg("localhost:11434")),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidEndpoint(_),
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn generate_returns_message_content() {
        let app = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                let user = body["messages"][1]["content"].as_str().unwrap_or("").to_string();
                Json(json!({ "message": { "role": "assistant", "content": format!("답: {user}") } }))
            }),
        );
        let base = serve(app).await;

        let svc = OllamaService::new(cfg(&base)).expect("svc");
        let out = svc.generate("DCT?", Some("sys")).await.expect("answer");
        assert_eq!(out, "답: DCT?");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::NOT_FOUND, "model not found") }),
        );
        let base = serve(app).await;

        let svc = OllamaService::new(cfg(&base)).expect("svc");
        let err = svc.generate("x", None).await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(HttpError { status, .. }),
                ..
            }) if status == StatusCode::NOT_FOUND
        ));
    }
}
