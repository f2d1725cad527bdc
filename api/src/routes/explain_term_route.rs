//! POST /api/explain-term: short explanation of one inspection term.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::Response};
use report_core::ExplainTermRequest;
use tracing::{info, instrument};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::reply_success,
        prompts::{EXPLAIN_SYSTEM, explain_prompt},
    },
    error_handler::{AppError, AppResult},
};

/// Handler: POST /api/explain-term
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/api/explain-term \
///   -H 'content-type: application/json' \
///   -d '{"term":"DPF"}'
/// ```
#[instrument(skip_all)]
pub async fn explain_term(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExplainTermRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let term = body.term.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest("term must not be empty".into()));
    }

    info!(%term, "explaining term");
    let text = state
        .llm
        .generate_fast(&explain_prompt(term), Some(EXPLAIN_SYSTEM))
        .await?;

    Ok(reply_success(text.trim()))
}
