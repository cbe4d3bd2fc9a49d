use crate::domain::payment::{
    AttemptStatus, ChargeRequest, ChargeResponse, ErrorEnvelope, ErrorPayload,
};
use crate::psp::mock::MockPsp;
use crate::psp::PspClient;
use crate::repo::payment_attempts_repo::{NewPaymentAttempt, PaymentAttemptsRepo};
use crate::repo::payments_repo::{PaymentRecordInput, PaymentsRepo};
use crate::repo::psps_repo::PspsRepo;
use crate::repo::routing_config_repo::RoutingConfigRepo;
use crate::router::selection::{select_next, SelectionError};
use crate::service::attempt_loop::{after_attempt, attempt_budget, LoopDirective};
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

/// Drives one logical payment through the selection engine: pick a PSP,
/// charge it, record the attempt, and on failure walk the fallback policy
/// with the attempted PSP excluded. Attempts run strictly sequentially so a
/// charge is never in flight on two PSPs at once.
#[derive(Clone)]
pub struct RoutingService {
    pub routing_config_repo: RoutingConfigRepo,
    pub psps_repo: PspsRepo,
    pub payments_repo: PaymentsRepo,
    pub payment_attempts_repo: PaymentAttemptsRepo,
}

impl RoutingService {
    pub async fn process(
        &self,
        req: ChargeRequest,
    ) -> Result<ChargeResponse, (axum::http::StatusCode, ErrorEnvelope)> {
        validate_request(&req)?;

        let config = self
            .routing_config_repo
            .get(&req.store_id)
            .await
            .map_err(|e| internal(e.into()))?;
        let Some(config) = config else {
            return Err((
                axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                err(
                    "NO_ROUTING_CONFIGURED",
                    "store has no routing configuration",
                ),
            ));
        };

        let budget = attempt_budget(config.max_retries, config.fallback_enabled);
        let payment_id = Uuid::new_v4();
        let started = Instant::now();

        let mut excluded: HashSet<String> = HashSet::new();
        let mut attempt_number = 0;
        let mut last_status = AttemptStatus::Failure;
        let mut psp_used: Option<String> = None;
        let mut last_reason = String::new();

        while attempt_number < budget {
            let selection =
                match select_next(Some(&config), &excluded, &mut rand::thread_rng()) {
                    Ok(selection) => selection,
                    Err(SelectionError::NoCandidate) => break,
                    Err(SelectionError::NoRoutingConfigured) => {
                        return Err((
                            axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                            err(
                                "NO_ROUTING_CONFIGURED",
                                "store has no routing configuration",
                            ),
                        ));
                    }
                };

            attempt_number += 1;

            let psp = self
                .psps_repo
                .get(&selection.psp_id)
                .await
                .map_err(internal)?
                .ok_or_else(|| {
                    internal(anyhow::anyhow!(
                        "routing selected psp {} which is not registered",
                        selection.psp_id
                    ))
                })?;

            let client = MockPsp::from_config(&psp);
            let attempt_started = Instant::now();
            let result = client.charge(&req).await.map_err(internal)?;
            let processing_time_ms = attempt_started.elapsed().as_millis() as i32;

            // Attempted once means never revisited, success or not.
            excluded.insert(selection.psp_id.clone());

            self.payment_attempts_repo
                .insert(NewPaymentAttempt {
                    payment_id,
                    store_id: req.store_id.clone(),
                    attempt_number,
                    psp_id: selection.psp_id.clone(),
                    is_fallback: attempt_number > 1,
                    status: result.status.as_str().to_string(),
                    processing_time_ms,
                    psp_metadata: Some(result.metadata.clone()),
                })
                .await
                .map_err(internal)?;

            tracing::info!(
                store_id = %req.store_id,
                payment_id = %payment_id,
                psp_id = %selection.psp_id,
                attempt_number,
                status = result.status.as_str(),
                reason = %selection.reason,
                "payment attempt finished"
            );

            last_status = result.status;
            psp_used = Some(selection.psp_id);
            last_reason = selection.reason;

            match after_attempt(last_status, attempt_number, budget, config.fallback_enabled) {
                LoopDirective::Done | LoopDirective::FailNow => break,
                LoopDirective::Continue => {}
            }
        }

        let latency_ms = started.elapsed().as_millis() as i32;
        // Timeouts surface to the caller as a plain failure; the attempt rows
        // keep the distinction.
        let final_status = if last_status.is_success() {
            AttemptStatus::Success
        } else {
            AttemptStatus::Failure
        };
        let routing_reason = if attempt_number == 0 {
            "no attempt made: retry budget or candidates exhausted".to_string()
        } else {
            last_reason
        };

        self.payments_repo
            .insert(&PaymentRecordInput {
                payment_id,
                store_id: req.store_id.clone(),
                amount_minor: req.amount_minor,
                currency: req.currency.clone(),
                status: final_status.as_str().to_string(),
                psp_used: psp_used.clone(),
                total_attempts: attempt_number,
                routing_reason: routing_reason.clone(),
                latency_ms,
            })
            .await
            .map_err(internal)?;

        Ok(ChargeResponse {
            payment_id,
            status: final_status,
            psp_used,
            total_attempts: attempt_number,
            routing_reason,
            latency_ms,
        })
    }
}

fn validate_request(
    req: &ChargeRequest,
) -> Result<(), (axum::http::StatusCode, ErrorEnvelope)> {
    if req.amount_minor <= 0 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            err("INVALID_AMOUNT", "amount_minor must be > 0"),
        ));
    }
    if req.currency.len() != 3 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            err("INVALID_CURRENCY", "currency must be a 3-letter code"),
        ));
    }
    if req.store_id.is_empty() {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            err("INVALID_STORE", "store_id must not be empty"),
        ));
    }
    Ok(())
}

fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

fn internal(e: anyhow::Error) -> (axum::http::StatusCode, ErrorEnvelope) {
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        err("INTERNAL_ERROR", &e.to_string()),
    )
}
