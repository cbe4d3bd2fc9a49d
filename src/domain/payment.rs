use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    Success,
    Failure,
    Timeout,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Success => "SUCCESS",
            AttemptStatus::Failure => "FAILURE",
            AttemptStatus::Timeout => "TIMEOUT",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptStatus::Success)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChargeRequest {
    pub store_id: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargeResponse {
    pub payment_id: Uuid,
    pub status: AttemptStatus,
    pub psp_used: Option<String>,
    pub total_attempts: i32,
    pub routing_reason: String,
    pub latency_ms: i32,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}
