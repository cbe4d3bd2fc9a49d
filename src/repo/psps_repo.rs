use crate::psp::PspConfig;
use anyhow::Result;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PspsRepo {
    pub pool: PgPool,
}

impl PspsRepo {
    pub async fn get(&self, psp_id: &str) -> Result<Option<PspConfig>> {
        let row = sqlx::query(
            "SELECT psp_id, store_id, psp_name, is_enabled, mock_behavior FROM psps WHERE psp_id=$1",
        )
        .bind(psp_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_config))
    }

    pub async fn list_for_store(&self, store_id: &str) -> Result<Vec<PspConfig>> {
        let rows = sqlx::query(
            "SELECT psp_id, store_id, psp_name, is_enabled, mock_behavior FROM psps WHERE store_id=$1 ORDER BY psp_name ASC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_config).collect())
    }
}

fn to_config(row: sqlx::postgres::PgRow) -> PspConfig {
    PspConfig {
        psp_id: row.get("psp_id"),
        store_id: row.get("store_id"),
        psp_name: row.get("psp_name"),
        is_enabled: row.get("is_enabled"),
        mock_behavior: row.get("mock_behavior"),
    }
}
