//! Contract with the external Q&A backend.
//!
//! Two request types cross this seam: a term explanation and a question about
//! a report. Both answer with the same [`ReplyEnvelope`]. Implementations
//! report transport problems as [`CollaboratorError`]; callers inside this
//! crate fold them into [`ReplyEnvelope::transport_failure`] immediately.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error_handler::CollaboratorError;
use crate::report::Report;

/// Shown when the backend could not be reached or answered garbage.
pub const COMMUNICATION_FAILURE: &str = "서버와 통신 중 오류가 발생했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// `{status, data?, message?}` reply shared by both request types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub status: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReplyEnvelope {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Success,
            data: Some(data.into()),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Synthetic reply standing in for a failed network round trip.
    pub fn transport_failure() -> Self {
        Self::error(COMMUNICATION_FAILURE)
    }

    /// The payload, only when the reply is a success that carries one.
    pub fn answer(&self) -> Option<&str> {
        match (self.status, self.data.as_deref()) {
            (ReplyStatus::Success, Some(data)) => Some(data),
            _ => None,
        }
    }

    /// Applies the success/fallback rule: `data` on success, else `message`,
    /// else `fallback`.
    pub fn text_or(&self, fallback: &str) -> String {
        self.answer()
            .or(self.message.as_deref())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Body of a term explanation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainTermRequest {
    pub term: String,
}

/// Body of a report question; the whole report travels as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskReportRequest {
    pub report_data: Report,
    pub user_question: String,
}

/// The backend answering explanation and report questions.
///
/// Futures must be `Send` so the view can run them as detached tasks.
pub trait QaCollaborator: Send + Sync + 'static {
    fn explain_term(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<ReplyEnvelope, CollaboratorError>> + Send;

    fn ask_about_report(
        &self,
        report: &Report,
        question: &str,
    ) -> impl Future<Output = Result<ReplyEnvelope, CollaboratorError>> + Send;
}
