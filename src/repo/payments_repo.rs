use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct PaymentRecordInput {
    pub payment_id: Uuid,
    pub store_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub psp_used: Option<String>,
    pub total_attempts: i32,
    pub routing_reason: String,
    pub latency_ms: i32,
}

impl PaymentsRepo {
    pub async fn insert(&self, input: &PaymentRecordInput) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, store_id, amount_minor, currency, status, psp_used,
                total_attempts, routing_reason, latency_ms
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
            "#,
        )
        .bind(input.payment_id)
        .bind(&input.store_id)
        .bind(input.amount_minor)
        .bind(&input.currency)
        .bind(&input.status)
        .bind(&input.psp_used)
        .bind(input.total_attempts)
        .bind(&input.routing_reason)
        .bind(input.latency_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
