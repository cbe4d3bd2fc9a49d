use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PspView {
    pub psp_id: String,
    pub psp_name: String,
    pub is_enabled: bool,
}

pub async fn list_store_psps(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> impl IntoResponse {
    match state.psps_repo.list_for_store(&store_id).await {
        Ok(items) => {
            let resp: Vec<PspView> = items
                .into_iter()
                .map(|p| PspView {
                    psp_id: p.psp_id,
                    psp_name: p.psp_name,
                    is_enabled: p.is_enabled,
                })
                .collect();
            (axum::http::StatusCode::OK, Json(resp)).into_response()
        }
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
