use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentAttemptsRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PaymentAttemptRow {
    pub payment_id: Uuid,
    pub store_id: String,
    pub attempt_number: i32,
    pub psp_id: String,
    pub is_fallback: bool,
    pub status: String,
    pub processing_time_ms: i32,
    pub psp_metadata: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentAttempt {
    pub payment_id: Uuid,
    pub store_id: String,
    pub attempt_number: i32,
    pub psp_id: String,
    pub is_fallback: bool,
    pub status: String,
    pub processing_time_ms: i32,
    pub psp_metadata: Option<serde_json::Value>,
}

impl PaymentAttemptsRepo {
    pub async fn insert(&self, in_row: NewPaymentAttempt) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_attempts (
                payment_id, store_id, attempt_number, psp_id, is_fallback, status,
                processing_time_ms, psp_metadata
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            ON CONFLICT (payment_id, attempt_number) DO NOTHING
            "#,
        )
        .bind(in_row.payment_id)
        .bind(in_row.store_id)
        .bind(in_row.attempt_number)
        .bind(in_row.psp_id)
        .bind(in_row.is_fallback)
        .bind(in_row.status)
        .bind(in_row.processing_time_ms)
        .bind(in_row.psp_metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_by_payment_id(&self, payment_id: Uuid) -> Result<Vec<PaymentAttemptRow>> {
        let rows = sqlx::query(
            r#"
            SELECT payment_id, store_id, attempt_number, psp_id, is_fallback, status,
                   processing_time_ms, psp_metadata, created_at
            FROM payment_attempts
            WHERE payment_id=$1
            ORDER BY attempt_number ASC
            "#,
        )
        .bind(payment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PaymentAttemptRow {
                payment_id: row.get("payment_id"),
                store_id: row.get("store_id"),
                attempt_number: row.get("attempt_number"),
                psp_id: row.get("psp_id"),
                is_fallback: row.get("is_fallback"),
                status: row.get("status"),
                processing_time_ms: row.get("processing_time_ms"),
                psp_metadata: row.get("psp_metadata"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
