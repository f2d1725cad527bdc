//! GET /: liveness probe.

use axum::Json;
use serde::Serialize;

pub const HEALTH_MESSAGE: &str = "AI 중고차 구매 가이드 백엔드 서버가 정상적으로 동작 중입니다!";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: HEALTH_MESSAGE,
    })
}
