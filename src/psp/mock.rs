use crate::domain::payment::{AttemptStatus, ChargeRequest};
use crate::psp::{PspChargeResult, PspClient, PspConfig};
use anyhow::Result;

pub struct MockPsp {
    pub psp_id: String,
    pub behavior: String,
}

impl MockPsp {
    pub fn from_config(config: &PspConfig) -> Self {
        Self {
            psp_id: config.psp_id.clone(),
            behavior: config
                .mock_behavior
                .clone()
                .unwrap_or_else(|| "ALWAYS_SUCCESS".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl PspClient for MockPsp {
    fn name(&self) -> &str {
        "mock"
    }

    async fn charge(&self, request: &ChargeRequest) -> Result<PspChargeResult> {
        let (status, transaction_ref, error_code) = match self.behavior.as_str() {
            "ALWAYS_FAILURE" => (
                AttemptStatus::Failure,
                None,
                Some("MOCK_DECLINED".to_string()),
            ),
            "ALWAYS_TIMEOUT" => (
                AttemptStatus::Timeout,
                None,
                Some("MOCK_TIMEOUT".to_string()),
            ),
            _ => (
                AttemptStatus::Success,
                Some(format!("mock_txn_{}", uuid::Uuid::new_v4())),
                None,
            ),
        };

        Ok(PspChargeResult {
            psp_used: self.psp_id.clone(),
            status,
            transaction_ref: transaction_ref.clone(),
            error_code: error_code.clone(),
            metadata: serde_json::json!({
                "adapter": "mock",
                "behavior": self.behavior,
                "amount_minor": request.amount_minor,
                "currency": request.currency,
                "transaction_ref": transaction_ref,
                "error_code": error_code,
            }),
        })
    }
}
