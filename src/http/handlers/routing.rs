use crate::domain::routing::{RoutingMode, SequenceInput, WeightInput};
use crate::repo::routing_config_repo::{ConfigStoreError, RoutingConfigPatch};
use crate::router::validate::{validate_sequence, validate_weights, ValidationError};
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

pub async fn get_routing_config(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> impl IntoResponse {
    match state.routing_config_repo.get(&store_id).await {
        Ok(Some(config)) => (axum::http::StatusCode::OK, Json(config)).into_response(),
        // An unconfigured store is a null payload, not an error.
        Ok(None) => (axum::http::StatusCode::OK, Json(serde_json::Value::Null)).into_response(),
        Err(e) => store_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertRoutingRequest {
    pub mode: Option<RoutingMode>,
    pub fallback_enabled: Option<bool>,
    pub max_retries: Option<i32>,
    pub weights: Option<Vec<WeightInput>>,
    pub fallback_sequence: Option<Vec<SequenceInput>>,
}

pub async fn upsert_routing_config(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(req): Json<UpsertRoutingRequest>,
) -> impl IntoResponse {
    if let Some(max_retries) = req.max_retries {
        if max_retries < 0 {
            return bad_request("max_retries must be non-negative");
        }
    }
    if let Some(weights) = &req.weights {
        if let Err(e) = validate_weights(weights) {
            return validation_error(e);
        }
    }
    if let Some(sequence) = &req.fallback_sequence {
        if let Err(e) = validate_sequence(sequence) {
            return validation_error(e);
        }
    }

    let patch = RoutingConfigPatch {
        mode: req.mode,
        fallback_enabled: req.fallback_enabled,
        max_retries: req.max_retries,
    };
    if let Err(e) = state.routing_config_repo.upsert(&store_id, &patch).await {
        return store_error(e);
    }
    if let Some(weights) = &req.weights {
        if let Err(e) = state
            .routing_config_repo
            .replace_weights(&store_id, weights)
            .await
        {
            return store_error(e);
        }
    }
    if let Some(sequence) = &req.fallback_sequence {
        if let Err(e) = state
            .routing_config_repo
            .replace_fallback_sequence(&store_id, sequence)
            .await
        {
            return store_error(e);
        }
    }

    resolved_config(&state, &store_id).await
}

pub async fn replace_weights(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(entries): Json<Vec<WeightInput>>,
) -> impl IntoResponse {
    if let Err(e) = validate_weights(&entries) {
        return validation_error(e);
    }
    match state
        .routing_config_repo
        .replace_weights(&store_id, &entries)
        .await
    {
        Ok(()) => resolved_config(&state, &store_id).await,
        Err(e) => store_error(e),
    }
}

pub async fn replace_fallback_sequence(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(entries): Json<Vec<SequenceInput>>,
) -> impl IntoResponse {
    if let Err(e) = validate_sequence(&entries) {
        return validation_error(e);
    }
    match state
        .routing_config_repo
        .replace_fallback_sequence(&store_id, &entries)
        .await
    {
        Ok(()) => resolved_config(&state, &store_id).await,
        Err(e) => store_error(e),
    }
}

async fn resolved_config(state: &AppState, store_id: &str) -> Response {
    match state.routing_config_repo.get(store_id).await {
        Ok(Some(config)) => (axum::http::StatusCode::OK, Json(config)).into_response(),
        Ok(None) => store_error(ConfigStoreError::ConfigNotFound(store_id.to_string())),
        Err(e) => store_error(e),
    }
}

fn validation_error(e: ValidationError) -> Response {
    (
        axum::http::StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": {"code": "INVALID_CONFIG", "message": e.to_string()}})),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        axum::http::StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": {"code": "INVALID_CONFIG", "message": message}})),
    )
        .into_response()
}

fn store_error(e: ConfigStoreError) -> Response {
    match e {
        ConfigStoreError::ConfigNotFound(store_id) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": {
                    "code": "CONFIG_NOT_FOUND",
                    "message": format!("no routing config exists for store {store_id}")
                }
            })),
        )
            .into_response(),
        e @ ConfigStoreError::UnknownPsp { .. } => (
            axum::http::StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": {"code": "UNKNOWN_PSP", "message": e.to_string()}
            })),
        )
            .into_response(),
        other => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": {"code": "INTERNAL_ERROR", "message": other.to_string()}})),
        )
            .into_response(),
    }
}
