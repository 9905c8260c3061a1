//! services/send_record_service.rs
//! Registro de auditoría `company_sends`: solo inserciones y lecturas.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::models::send_model::{NewSendRecord, SendRecord};

#[derive(Clone, Debug)]
pub struct SendRecordService {
    db_pool: Pool<Sqlite>,
}

impl SendRecordService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SendRecordService { db_pool }
    }

    /// Inserta todas las filas en una transacción: o quedan todas o ninguna.
    pub async fn record_sends(&self, records: &[NewSendRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let now = Utc::now().to_rfc3339();

        let mut tx = self
            .db_pool
            .begin()
            .await
            .context("No se pudo abrir la transacción de company_sends")?;

        for rec in records {
            sqlx::query(
                r#"
                INSERT INTO company_sends (
                    id, company_id, webhook_id, employee_range,
                    batch_id, status, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&rec.company_id)
            .bind(&rec.webhook_id)
            .bind(&rec.employee_range)
            .bind(&rec.batch_id)
            .bind(rec.status.as_str())
            .bind(&now)
            .execute(&mut *tx)
            .await
            .context("Error insertando company_sends")?;
        }

        tx.commit()
            .await
            .context("Error confirmando company_sends")?;

        Ok(records.len())
    }

    /// Ids de todas las compañías ya enviadas, de cualquier rango.
    pub async fn sent_company_ids(&self) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"SELECT DISTINCT company_id FROM company_sends ORDER BY company_id"#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Error leyendo company_sends")?;
        Ok(ids)
    }

    /// (employee_range, cantidad) agrupado tal cual está en la tabla.
    pub async fn sent_counts_by_range(&self) -> Result<Vec<(Option<String>, i64)>> {
        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(
            r#"
            SELECT employee_range, COUNT(*) AS cnt
            FROM company_sends
            GROUP BY employee_range
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Error contando company_sends por rango")?;
        Ok(rows)
    }

    pub async fn list_for_batch(&self, batch_id: &str) -> Result<Vec<SendRecord>> {
        let rows = sqlx::query_as::<_, SendRecord>(
            r#"
            SELECT id, company_id, webhook_id, employee_range,
                   batch_id, status, created_at
            FROM company_sends
            WHERE batch_id = ?1
            ORDER BY created_at, company_id
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Error listando company_sends del lote")?;
        Ok(rows)
    }
}
