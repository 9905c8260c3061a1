//! services/ingest_service.rs
//! Recibe personas enriquecidas de vuelta y las guarda en `enriched_people`,
//! dejando una fila de auditoría en `enrichment_logs`.

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::ingest_model::{NewEnrichmentLog, PersonRecord};

#[derive(Clone, Debug)]
pub struct IngestService {
    db_pool: Pool<Sqlite>,
    audit_log: bool,
}

/// Payload ya separado en registros.
#[derive(Debug, Default)]
pub struct ParsedPayload {
    pub records: Vec<PersonRecord>,
    pub batch_id: Option<String>,
}

/// Payload rechazado; conserva lo necesario para auditar.
#[derive(Debug)]
pub struct PayloadError {
    pub batch_id: Option<String>,
    pub received: usize,
    pub message: String,
}

/// Acepta un objeto o un arreglo de objetos. El batch_id sale del
/// `_batch_metadata` del primer registro.
pub fn parse_payload(body: Value) -> Result<ParsedPayload, PayloadError> {
    let items = match body {
        Value::Array(items) => items,
        other => vec![other],
    };

    let batch_id = items
        .first()
        .and_then(|first| first.get("_batch_metadata"))
        .and_then(|meta| meta.get("batch_id"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let received = items.len();
    let mut records = Vec::with_capacity(received);
    for (idx, item) in items.into_iter().enumerate() {
        let message = if item.is_object() {
            match serde_json::from_value::<PersonRecord>(item) {
                Ok(rec) => {
                    records.push(rec.normalized());
                    continue;
                }
                Err(e) => format!("Invalid record {}: {}", idx, e),
            }
        } else {
            format!("Record {} is not an object", idx)
        };
        return Err(PayloadError {
            batch_id,
            received,
            message,
        });
    }

    Ok(ParsedPayload { records, batch_id })
}

impl IngestService {
    pub fn new(db_pool: Pool<Sqlite>, audit_log: bool) -> Self {
        IngestService { db_pool, audit_log }
    }

    /// Cuerpo crudo del POST. Si no es JSON se audita como error y se
    /// responde 400.
    pub async fn ingest_raw(&self, body: &[u8], source_ip: Option<String>) -> Result<usize, ApiError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => self.ingest(value, source_ip).await,
            Err(e) => {
                let message = format!("Invalid JSON body: {}", e);
                log::warn!("(ingest_raw) {}", message);
                self.audit(NewEnrichmentLog {
                    batch_id: None,
                    records_received: 0,
                    records_inserted: 0,
                    status: "error",
                    error_message: Some(message.clone()),
                    source_ip,
                })
                .await;
                Err(ApiError::validation(message))
            }
        }
    }

    /// Procesa un POST completo: parseo, inserción y auditoría.
    /// Devuelve cuántas filas se insertaron.
    pub async fn ingest(&self, body: Value, source_ip: Option<String>) -> Result<usize, ApiError> {
        let parsed = match parse_payload(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("(ingest) Payload inválido: {}", err.message);
                self.audit(NewEnrichmentLog {
                    batch_id: err.batch_id,
                    records_received: err.received,
                    records_inserted: 0,
                    status: "error",
                    error_message: Some(err.message.clone()),
                    source_ip,
                })
                .await;
                return Err(ApiError::validation(err.message));
            }
        };

        let received = parsed.records.len();
        if received == 0 {
            self.audit(NewEnrichmentLog {
                batch_id: parsed.batch_id,
                records_received: 0,
                records_inserted: 0,
                status: "error",
                error_message: Some("No data provided".to_string()),
                source_ip,
            })
            .await;
            return Err(ApiError::validation("No data provided"));
        }

        match self.insert_people(&parsed.records).await {
            Ok(inserted) => {
                log::info!(
                    "(ingest) batch_id={:?} recibidos={} insertados={}",
                    parsed.batch_id,
                    received,
                    inserted
                );
                self.audit(NewEnrichmentLog {
                    batch_id: parsed.batch_id,
                    records_received: received,
                    records_inserted: inserted,
                    status: "success",
                    error_message: None,
                    source_ip,
                })
                .await;
                Ok(inserted)
            }
            Err(e) => {
                log::error!("(ingest) Error insertando personas: {:?}", e);
                self.audit(NewEnrichmentLog {
                    batch_id: parsed.batch_id,
                    records_received: received,
                    records_inserted: 0,
                    status: "error",
                    error_message: Some(format!("{:#}", e)),
                    source_ip,
                })
                .await;
                Err(ApiError::database("Failed to insert: ", e))
            }
        }
    }

    pub async fn insert_people(&self, records: &[PersonRecord]) -> Result<usize> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self
            .db_pool
            .begin()
            .await
            .context("No se pudo abrir la transacción de enriched_people")?;

        for rec in records {
            sqlx::query(
                r#"
                INSERT INTO enriched_people (
                    id, first_name, last_name, full_name, company_name,
                    company_domain, job_title, location, domain,
                    person_linkedin_url, last_experience_title,
                    last_experience_company, last_experience_start_date,
                    notes, company_linkedin_url, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&rec.first_name)
            .bind(&rec.last_name)
            .bind(&rec.full_name)
            .bind(&rec.company_name)
            .bind(&rec.company_domain)
            .bind(&rec.job_title)
            .bind(&rec.location)
            .bind(&rec.domain)
            .bind(&rec.person_linkedin_url)
            .bind(&rec.last_experience_title)
            .bind(&rec.last_experience_company)
            .bind(&rec.last_experience_start_date)
            .bind(&rec.notes)
            .bind(&rec.company_linkedin_url)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .context("Error insertando enriched_people")?;
        }

        tx.commit()
            .await
            .context("Error confirmando enriched_people")?;
        Ok(records.len())
    }

    /// Escribe la fila de auditoría si está habilitada. Un fallo aquí solo
    /// se loguea.
    async fn audit(&self, entry: NewEnrichmentLog) {
        if !self.audit_log {
            return;
        }
        if let Err(e) = self.write_log(&entry).await {
            log::error!("(audit) No se pudo escribir enrichment_logs: {:?}", e);
        }
    }

    async fn write_log(&self, entry: &NewEnrichmentLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO enrichment_logs (
                id, batch_id, records_received, records_inserted,
                status, error_message, source_ip, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.batch_id)
        .bind(entry.records_received as i64)
        .bind(entry.records_inserted as i64)
        .bind(entry.status)
        .bind(&entry.error_message)
        .bind(&entry.source_ip)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Error insertando enrichment_logs")?;
        Ok(())
    }
}
