//! HTTP implementation of [`QaCollaborator`].
//!
//! - `POST {base}/api/explain-term` with `{term}`
//! - `POST {base}/api/ask-report`   with `{reportData, userQuestion}`
//!
//! A non-2xx response whose body is still a reply envelope is returned as
//! that envelope, since the backend uses envelopes for its own failures.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::collaborator::{ExplainTermRequest, QaCollaborator, ReplyEnvelope};
use crate::config::CollaboratorConfig;
use crate::error_handler::{CollaboratorError, Result as CoreResult, make_snippet};
use crate::report::Report;

/// Thin reqwest client for the Q&A backend.
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    client: reqwest::Client,
    url_explain: String,
    url_ask: String,
}

impl HttpCollaborator {
    /// # Errors
    /// [`CollaboratorError::Transport`] if the HTTP client cannot be built.
    pub fn new(cfg: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url_explain: cfg.explain_url(),
            url_ask: cfg.ask_url(),
        })
    }

    /// Builds a client from `REPORT_API_URL` / `REPORT_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// [`crate::ReportCoreError::Config`] for malformed variables,
    /// [`crate::ReportCoreError::Collaborator`] if the client cannot be built.
    pub fn from_env() -> CoreResult<Self> {
        let cfg = CollaboratorConfig::from_env()?;
        Ok(Self::new(&cfg)?)
    }

    #[instrument(skip(self, body))]
    async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<ReplyEnvelope, CollaboratorError> {
        let started = Instant::now();
        debug!("POST");

        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        match serde_json::from_str::<ReplyEnvelope>(&text) {
            Ok(envelope) => {
                debug!(
                    %status,
                    reply_status = ?envelope.status,
                    latency_ms = started.elapsed().as_millis(),
                    "collaborator replied"
                );
                Ok(envelope)
            }
            Err(e) if status.is_success() => {
                warn!(%url, error = %e, "collaborator reply is not an envelope");
                Err(CollaboratorError::Decode(format!(
                    "serde error: {e}; expected `{{ status, data?, message? }}`"
                )))
            }
            Err(_) => {
                let snippet = make_snippet(&text);
                warn!(%url, %status, %snippet, "collaborator returned non-success status");
                Err(CollaboratorError::HttpStatus {
                    status,
                    url: url.to_string(),
                    snippet,
                })
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AskReportBody<'a> {
    report_data: &'a Report,
    user_question: &'a str,
}

impl QaCollaborator for HttpCollaborator {
    async fn explain_term(&self, term: &str) -> Result<ReplyEnvelope, CollaboratorError> {
        let body = ExplainTermRequest {
            term: term.to_string(),
        };
        self.post(&self.url_explain, &body).await
    }

    async fn ask_about_report(
        &self,
        report: &Report,
        question: &str,
    ) -> Result<ReplyEnvelope, CollaboratorError> {
        let body = AskReportBody {
            report_data: report,
            user_question: question,
        };
        self.post(&self.url_ask, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

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

    fn client(base: &str) -> HttpCollaborator {
        let cfg = CollaboratorConfig::new(base, 5).expect("config");
        HttpCollaborator::new(&cfg).expect("client")
    }

    #[tokio::test]
    async fn explain_posts_term_and_decodes_envelope() {
        let app = Router::new().route(
            "/api/explain-term",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"status": "success", "data": format!("{} 설명", body["term"].as_str().unwrap_or(""))}))
            }),
        );
        let base = serve(app).await;

        let reply = client(&base).explain_term("DPF").await.expect("reply");
        assert_eq!(reply.answer(), Some("DPF 설명"));
    }

    #[tokio::test]
    async fn ask_sends_report_and_question() {
        let app = Router::new().route(
            "/api/ask-report",
            post(|Json(body): Json<Value>| async move {
                let model = body["reportData"]["basicInfo"]["modelName"].clone();
                let q = body["userQuestion"].clone();
                Json(json!({"status": "success", "data": format!("{model}/{q}")}))
            }),
        );
        let base = serve(app).await;

        let report: Report = serde_json::from_value(json!({"basicInfo": {"modelName": "K5"}}))
            .expect("report");
        let reply = client(&base)
            .ask_about_report(&report, "연비?")
            .await
            .expect("reply");
        assert_eq!(reply.answer(), Some("\"K5\"/\"연비?\""));
    }

    #[tokio::test]
    async fn error_status_with_envelope_body_is_a_reply() {
        let app = Router::new().route(
            "/api/explain-term",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({"status": "error", "message": "LLM 응답 실패"})),
                )
            }),
        );
        let base = serve(app).await;

        let reply = client(&base).explain_term("DCT").await.expect("reply");
        assert_eq!(reply.text_or("fallback"), "LLM 응답 실패");
    }

    #[tokio::test]
    async fn error_status_with_plain_body_is_an_error() {
        let app = Router::new().route(
            "/api/explain-term",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;

        let err = client(&base).explain_term("DCT").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::HttpStatus { ref snippet, .. } if snippet == "boom"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let err = client(&format!("http://{addr}"))
            .explain_term("DPF")
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Transport(_)));
    }
}
