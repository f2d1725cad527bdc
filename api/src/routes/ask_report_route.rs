//! POST /api/ask-report: answers a question grounded in one report.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::Response};
use report_core::AskReportRequest;
use tracing::{info, instrument};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::reply_success,
        prompts::{ASK_SYSTEM, ask_prompt},
    },
    error_handler::{AppError, AppResult},
};

/// Handler: POST /api/ask-report
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/api/ask-report \
///   -H 'content-type: application/json' \
///   -d '{"reportData":{"basicInfo":{"modelName":"K5"}},"userQuestion":"연비는?"}'
/// ```
#[instrument(skip_all)]
pub async fn ask_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskReportRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    if body.user_question.trim().is_empty() {
        return Err(AppError::BadRequest("userQuestion must not be empty".into()));
    }
    if body.report_data.is_empty() {
        return Err(AppError::BadRequest("reportData has no sections".into()));
    }

    let prompt = ask_prompt(&body.report_data, &body.user_question, state.max_context_chars);
    info!(
        question_len = body.user_question.chars().count(),
        prompt_len = prompt.len(),
        "answering report question"
    );
    let text = state.llm.generate_slow(&prompt, Some(ASK_SYSTEM)).await?;

    Ok(reply_success(text.trim()))
}
