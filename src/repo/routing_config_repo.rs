use crate::domain::routing::{
    FallbackEntry, PspWeight, RoutingConfig, RoutingMode, SequenceInput, WeightInput,
};
use serde::Deserialize;
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("no routing config exists for store {0}")]
    ConfigNotFound(String),
    #[error("psp {psp_id} is not configured for store {store_id}")]
    UnknownPsp { psp_id: String, store_id: String },
    #[error("stored routing mode '{0}' is not recognized")]
    UnknownMode(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct RoutingConfigRepo {
    pub pool: PgPool,
}

/// Partial update for the base config row. `None` fields are left untouched;
/// on first write the missing fields fall back to the column defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutingConfigPatch {
    pub mode: Option<RoutingMode>,
    pub fallback_enabled: Option<bool>,
    pub max_retries: Option<i32>,
}

impl RoutingConfigRepo {
    /// Loads the resolved config: base row plus weights and sequence joined
    /// with PSP display names, sequence sorted ascending. An unconfigured
    /// store is `None`, not an error.
    pub async fn get(&self, store_id: &str) -> Result<Option<RoutingConfig>, ConfigStoreError> {
        let row = sqlx::query(
            "SELECT id, store_id, mode, fallback_enabled, max_retries FROM routing_configs WHERE store_id=$1",
        )
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let config_id: Uuid = row.get("id");
        let mode_raw: String = row.get("mode");
        let mode =
            RoutingMode::parse(&mode_raw).ok_or_else(|| ConfigStoreError::UnknownMode(mode_raw))?;

        let weight_rows = sqlx::query(
            r#"
            SELECT w.psp_id, p.psp_name, w.weight
            FROM psp_weights w
            JOIN psps p ON p.psp_id = w.psp_id
            WHERE w.routing_config_id=$1
            ORDER BY p.psp_name ASC
            "#,
        )
        .bind(config_id)
        .fetch_all(&self.pool)
        .await?;

        let sequence_rows = sqlx::query(
            r#"
            SELECT s.psp_id, p.psp_name, s.sort_order
            FROM fallback_sequences s
            JOIN psps p ON p.psp_id = s.psp_id
            WHERE s.routing_config_id=$1
            ORDER BY s.sort_order ASC
            "#,
        )
        .bind(config_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RoutingConfig {
            store_id: row.get("store_id"),
            mode,
            fallback_enabled: row.get("fallback_enabled"),
            max_retries: row.get("max_retries"),
            psp_weights: weight_rows
                .into_iter()
                .map(|r| PspWeight {
                    psp_id: r.get("psp_id"),
                    psp_name: r.get("psp_name"),
                    weight: r.get("weight"),
                })
                .collect(),
            fallback_sequence: sequence_rows
                .into_iter()
                .map(|r| FallbackEntry {
                    psp_id: r.get("psp_id"),
                    psp_name: r.get("psp_name"),
                    order: r.get("sort_order"),
                })
                .collect(),
        }))
    }

    /// Creates the base config on first write, otherwise patches only the
    /// supplied fields. Returns the resolved config.
    pub async fn upsert(
        &self,
        store_id: &str,
        patch: &RoutingConfigPatch,
    ) -> Result<RoutingConfig, ConfigStoreError> {
        sqlx::query(
            r#"
            INSERT INTO routing_configs (store_id, mode, fallback_enabled, max_retries, updated_at)
            VALUES ($1, COALESCE($2, 'MANUAL'), COALESCE($3, true), COALESCE($4, 1), now())
            ON CONFLICT (store_id) DO UPDATE SET
                mode = COALESCE($2, routing_configs.mode),
                fallback_enabled = COALESCE($3, routing_configs.fallback_enabled),
                max_retries = COALESCE($4, routing_configs.max_retries),
                updated_at = now()
            "#,
        )
        .bind(store_id)
        .bind(patch.mode.map(|m| m.as_str()))
        .bind(patch.fallback_enabled)
        .bind(patch.max_retries)
        .execute(&self.pool)
        .await?;

        self.get(store_id)
            .await?
            .ok_or_else(|| ConfigStoreError::ConfigNotFound(store_id.to_string()))
    }

    /// Atomically swaps the weight set: delete all, insert all, one
    /// transaction, so a concurrent reader never sees a half-replaced or
    /// empty table for a configured store. Empty input clears the weights.
    pub async fn replace_weights(
        &self,
        store_id: &str,
        entries: &[WeightInput],
    ) -> Result<(), ConfigStoreError> {
        let config_id = self.config_id(store_id).await?;
        self.check_psps_known(store_id, entries.iter().map(|e| e.psp_id.as_str()))
            .await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM psp_weights WHERE routing_config_id=$1")
            .bind(config_id)
            .execute(&mut *tx)
            .await?;
        for entry in entries {
            sqlx::query("INSERT INTO psp_weights (routing_config_id, psp_id, weight) VALUES ($1,$2,$3)")
                .bind(config_id)
                .bind(&entry.psp_id)
                .bind(entry.weight)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    /// Same replace-all contract as `replace_weights`, for the sequence.
    pub async fn replace_fallback_sequence(
        &self,
        store_id: &str,
        entries: &[SequenceInput],
    ) -> Result<(), ConfigStoreError> {
        let config_id = self.config_id(store_id).await?;
        self.check_psps_known(store_id, entries.iter().map(|e| e.psp_id.as_str()))
            .await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM fallback_sequences WHERE routing_config_id=$1")
            .bind(config_id)
            .execute(&mut *tx)
            .await?;
        for entry in entries {
            sqlx::query(
                "INSERT INTO fallback_sequences (routing_config_id, psp_id, sort_order) VALUES ($1,$2,$3)",
            )
            .bind(config_id)
            .bind(&entry.psp_id)
            .bind(entry.order)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    /// Every psp_id in a replacement payload must belong to the store's PSP
    /// registry; the whole write is rejected otherwise.
    async fn check_psps_known<'a>(
        &self,
        store_id: &str,
        psp_ids: impl Iterator<Item = &'a str>,
    ) -> Result<(), ConfigStoreError> {
        let rows = sqlx::query("SELECT psp_id FROM psps WHERE store_id=$1")
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;
        let known: std::collections::HashSet<String> =
            rows.into_iter().map(|r| r.get("psp_id")).collect();

        for psp_id in psp_ids {
            if !known.contains(psp_id) {
                return Err(ConfigStoreError::UnknownPsp {
                    psp_id: psp_id.to_string(),
                    store_id: store_id.to_string(),
                });
            }
        }
        Ok(())
    }

    async fn config_id(&self, store_id: &str) -> Result<Uuid, ConfigStoreError> {
        let row = sqlx::query("SELECT id FROM routing_configs WHERE store_id=$1")
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.get("id"))
            .ok_or_else(|| ConfigStoreError::ConfigNotFound(store_id.to_string()))
    }
}
