use sqlx::AnyPool;
use tracing::{debug, info};

use crate::domain::crosswalk::CrosswalkRecord;
use crate::domain::error::{AppError, Result};

/// Persistence for the `crosswalk` table.
///
/// The table carries three text columns and a unique index on
/// (vendor_id, supplier_id); the upsert relies on that index for its
/// conflict target.
pub struct CrosswalkRepository {
    pool: AnyPool,
}

impl CrosswalkRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Ensure the crosswalk table and its uniqueness constraint exist.
    /// With `rebuild`, the table is dropped first. That destroys all
    /// previously loaded rows and is only ever triggered by an explicit
    /// operator flag.
    pub async fn ensure_schema(&self, rebuild: bool) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        if rebuild {
            info!("rebuild requested, dropping crosswalk table");
            sqlx::query("DROP TABLE IF EXISTS crosswalk")
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to drop crosswalk table: {}", e))
                })?;
        }

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS crosswalk (
                tow_code    TEXT NOT NULL,
                supplier_id TEXT NOT NULL,
                vendor_id   TEXT
            )",
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create crosswalk table: {}", e)))?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS ix_crosswalk_vendor_supplier
             ON crosswalk (vendor_id, supplier_id)",
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to create crosswalk unique index: {}", e))
        })?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit schema setup: {}", e)))
    }

    /// Apply the whole batch inside one transaction: insert each record,
    /// and on a (vendor_id, supplier_id) conflict overwrite the existing
    /// row's tow_code. Either every row lands or none does.
    pub async fn upsert_all(&self, records: &[CrosswalkRecord]) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let mut affected: u64 = 0;
        for record in records {
            let res = sqlx::query(
                "INSERT INTO crosswalk (tow_code, supplier_id, vendor_id)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (vendor_id, supplier_id)
                 DO UPDATE SET tow_code = EXCLUDED.tow_code",
            )
            .bind(&record.tow_code)
            .bind(&record.supplier_id)
            .bind(&record.vendor_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to upsert crosswalk row: {}", e))
            })?;
            affected += res.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit batch: {}", e)))?;

        debug!(records = records.len(), "crosswalk batch committed");
        Ok(affected)
    }
}
