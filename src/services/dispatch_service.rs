//! services/dispatch_service.rs
//! Envío de lotes de compañías a webhooks: reparto por capacidad,
//! POST concurrente por sub-lote con pausa fija entre sub-lotes, y registro
//! de cada envío en `company_sends`.

use anyhow::{anyhow, Context, Result};
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    config::DispatchConfig,
    errors::ApiError,
    models::{
        company_model::Company,
        send_model::{
            BatchMetadata, NewSendRecord, SendRequest, SendResponse, SendStatus, WebhookTally,
            WebhookTarget,
        },
    },
    services::{
        company_service::CompanyService,
        distribution_service::distribute,
        range_service::max_companies_for_range,
        send_record_service::SendRecordService,
    },
};

/// Datos compartidos por todas las compañías de un lote.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub batch_id: String,
    pub batch_timestamp: String,
    pub employee_range: String,
}

impl BatchContext {
    pub fn new(employee_range: &str) -> Self {
        BatchContext {
            batch_id: Uuid::new_v4().to_string(),
            batch_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            employee_range: employee_range.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct DispatchService {
    company_service: CompanyService,
    send_record_service: SendRecordService,
    http_client: Client,
    config: DispatchConfig,
}

impl DispatchService {
    pub fn new(
        company_service: CompanyService,
        send_record_service: SendRecordService,
        config: DispatchConfig,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("No se pudo construir el cliente HTTP")?;

        Ok(Self {
            company_service,
            send_record_service,
            http_client,
            config,
        })
    }

    /// Procesa un POST /api/send completo.
    pub async fn send_batch(&self, req: SendRequest) -> Result<SendResponse, ApiError> {
        if req.company_ids.is_empty() || req.webhooks.is_empty() {
            return Err(ApiError::validation("companyIds and webhooks are required"));
        }

        // 1) Cargar compañías (en el orden pedido)
        let companies = self
            .company_service
            .fetch_by_ids(&req.company_ids, self.config.fetch_chunk_size)
            .await
            .map_err(|e| {
                log::error!("(send_batch) Error leyendo compañías: {:?}", e);
                ApiError::database("Failed to fetch companies: ", e)
            })?;

        if companies.is_empty() {
            return Err(ApiError::not_found("No companies found for the given IDs"));
        }

        // 2) Repartir entre webhooks según la capacidad del rango
        let capacity = max_companies_for_range(&req.employee_range);
        let distribution = distribute(&companies, &req.webhooks, capacity);
        if capacity == 0 {
            log::warn!(
                "(send_batch) El rango '{}' tiene capacidad 0 por webhook; no se asigna ninguna compañía.",
                req.employee_range
            );
        }

        let batch = BatchContext::new(&req.employee_range);
        log::info!(
            "(send_batch) batch_id={} range='{}' compañías={} webhooks={} capacidad={} asignadas={} sin_asignar={} skip={}",
            batch.batch_id,
            batch.employee_range,
            companies.len(),
            req.webhooks.len(),
            capacity,
            distribution.assigned(),
            distribution.unassigned,
            req.skip_webhooks
        );

        // 3) Enviar y registrar, webhook por webhook
        let mut results = Vec::with_capacity(distribution.assignments.len());
        for assignment in &distribution.assignments {
            let webhook = assignment.webhook;
            let slice = assignment.companies;

            let outcomes = if req.skip_webhooks {
                vec![true; slice.len()]
            } else {
                self.dispatch_slice(&batch, webhook, slice).await
            };
            let sent = outcomes.iter().filter(|ok| **ok).count();
            let failed = outcomes.len() - sent;

            let records = self.send_records(&batch, webhook, slice, &outcomes);
            self.send_record_service
                .record_sends(&records)
                .await
                .map_err(|e| {
                    log::error!(
                        "(send_batch) No se pudieron registrar los envíos de '{}' (batch_id={}): {:?}",
                        webhook.name,
                        batch.batch_id,
                        e
                    );
                    ApiError::database("Failed to record sends: ", e)
                })?;

            log::info!(
                "(send_batch) Webhook '{}' -> enviados={} fallidos={}",
                webhook.name,
                sent,
                failed
            );
            results.push(WebhookTally {
                webhook: webhook.name.clone(),
                sent,
                failed,
            });
        }

        Ok(SendResponse {
            success: true,
            batch_id: batch.batch_id,
            batch_timestamp: batch.batch_timestamp,
            employee_range: batch.employee_range,
            total_companies: companies.len(),
            distribution: results,
            companies_not_assigned: distribution.unassigned,
        })
    }

    /// Envía el tramo de un webhook en sub-lotes concurrentes de
    /// `sub_batch_size`, con pausa de `interval` entre sub-lotes.
    /// Devuelve un bool por compañía, en el mismo orden.
    pub async fn dispatch_slice(
        &self,
        batch: &BatchContext,
        webhook: &WebhookTarget,
        companies: &[Company],
    ) -> Vec<bool> {
        let chunk_size = self.config.sub_batch_size.max(1);
        let total_chunks = companies.len().div_ceil(chunk_size);
        let mut outcomes = Vec::with_capacity(companies.len());

        for (idx, chunk) in companies.chunks(chunk_size).enumerate() {
            let results = join_all(
                chunk
                    .iter()
                    .map(|company| self.post_company(batch, webhook, company)),
            )
            .await;
            outcomes.extend(results);

            if idx + 1 < total_chunks {
                tokio::time::sleep(self.config.interval()).await;
            }
        }

        outcomes
    }

    async fn post_company(
        &self,
        batch: &BatchContext,
        webhook: &WebhookTarget,
        company: &Company,
    ) -> bool {
        match self.try_post_company(batch, webhook, company).await {
            Ok(status) if status.is_success() => true,
            Ok(status) => {
                log::warn!(
                    "(post_company) '{}' respondió {} para company_id={}",
                    webhook.name,
                    status,
                    company.id
                );
                false
            }
            Err(e) => {
                log::warn!(
                    "(post_company) Fallo enviando company_id={} a '{}': {:#}",
                    company.id,
                    webhook.name,
                    e
                );
                false
            }
        }
    }

    async fn try_post_company(
        &self,
        batch: &BatchContext,
        webhook: &WebhookTarget,
        company: &Company,
    ) -> Result<StatusCode> {
        let metadata = BatchMetadata {
            batch_id: batch.batch_id.clone(),
            batch_timestamp: batch.batch_timestamp.clone(),
            employee_range: batch.employee_range.clone(),
            webhook_name: webhook.name.clone(),
            source: self.config.source_tag.clone(),
        };
        let payload = company_payload(company, &metadata)?;

        let resp = self
            .http_client
            .post(&webhook.webhook_url)
            .json(&payload)
            .send()
            .await
            .context("Fallo al hacer POST al webhook")?;

        Ok(resp.status())
    }

    fn send_records(
        &self,
        batch: &BatchContext,
        webhook: &WebhookTarget,
        companies: &[Company],
        outcomes: &[bool],
    ) -> Vec<NewSendRecord> {
        let employee_range =
            Some(batch.employee_range.clone()).filter(|range| !range.is_empty());

        companies
            .iter()
            .zip(outcomes)
            .map(|(company, delivered)| NewSendRecord {
                company_id: company.id.clone(),
                webhook_id: webhook.id.clone(),
                employee_range: employee_range.clone(),
                batch_id: batch.batch_id.clone(),
                status: if *delivered || !self.config.record_delivery_outcome {
                    SendStatus::Sent
                } else {
                    SendStatus::Failed
                },
            })
            .collect()
    }
}

/// La compañía como objeto JSON, con `_batch_metadata` agregado.
pub fn company_payload(company: &Company, metadata: &BatchMetadata) -> Result<Value> {
    let mut value = serde_json::to_value(company).context("No se pudo serializar la compañía")?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| anyhow!("La compañía no se serializó como objeto"))?;
    obj.insert(
        "_batch_metadata".to_string(),
        serde_json::to_value(metadata).context("No se pudo serializar _batch_metadata")?,
    );
    Ok(value)
}
