use crate::domain::payment::ChargeRequest;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<ChargeRequest>,
) -> impl IntoResponse {
    match state.routing_service.process(req).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err((status, envelope)) => (status, Json(envelope)).into_response(),
    }
}

pub async fn list_attempts(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let attempts = match state.payment_attempts_repo.list_by_payment_id(payment_id).await {
        Ok(v) => v,
        Err(e) => {
            return (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    let final_status = attempts
        .last()
        .map(|a| a.status.clone())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let total_processing_time_ms: i32 = attempts.iter().map(|a| a.processing_time_ms).sum();

    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({
            "payment_id": payment_id,
            "total_attempts": attempts.len(),
            "final_status": final_status,
            "total_processing_time_ms": total_processing_time_ms,
            "attempts": attempts
        })),
    )
        .into_response()
}
