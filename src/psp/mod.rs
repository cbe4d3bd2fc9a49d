use crate::domain::payment::{AttemptStatus, ChargeRequest};
use anyhow::Result;

pub mod mock;

/// A PSP as configured for a store. `mock_behavior` drives the mock adapter
/// in test and staging environments.
#[derive(Debug, Clone)]
pub struct PspConfig {
    pub psp_id: String,
    pub store_id: String,
    pub psp_name: String,
    pub is_enabled: bool,
    pub mock_behavior: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PspChargeResult {
    pub psp_used: String,
    pub status: AttemptStatus,
    pub transaction_ref: Option<String>,
    pub error_code: Option<String>,
    pub metadata: serde_json::Value,
}

/// Seam between the attempt loop and the actual capture protocol. The loop
/// only cares about the normalized outcome; the adapter owns everything
/// PSP-specific.
#[async_trait::async_trait]
pub trait PspClient: Send + Sync {
    fn name(&self) -> &str;

    async fn charge(&self, request: &ChargeRequest) -> Result<PspChargeResult>;
}
