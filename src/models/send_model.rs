//! models/send_model.rs
//! Estructuras para POST /api/send y para la tabla `company_sends`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Webhook destino tal como lo manda el dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookTarget {
    pub id: String,
    pub webhook_url: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default)]
    pub company_ids: Vec<String>,
    #[serde(default)]
    pub webhooks: Vec<WebhookTarget>,
    #[serde(default)]
    pub employee_range: String,
    /// Para pruebas: no llama a los webhooks, solo registra los envíos.
    #[serde(default)]
    pub skip_webhooks: bool,
}

/// Resultado del envío para un webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookTally {
    pub webhook: String,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub batch_id: String,
    pub batch_timestamp: String,
    pub employee_range: String,
    pub total_companies: usize,
    pub distribution: Vec<WebhookTally>,
    pub companies_not_assigned: usize,
}

/// Metadatos que viajan con cada compañía como `_batch_metadata`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchMetadata {
    pub batch_id: String,
    pub batch_timestamp: String,
    pub employee_range: String,
    pub webhook_name: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Sent,
    Failed,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStatus::Sent => "sent",
            SendStatus::Failed => "failed",
        }
    }
}

/// Fila nueva para `company_sends` (solo inserción).
#[derive(Debug, Clone)]
pub struct NewSendRecord {
    pub company_id: String,
    pub webhook_id: String,
    pub employee_range: Option<String>,
    pub batch_id: String,
    pub status: SendStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SendRecord {
    pub id: String,
    pub company_id: String,
    pub webhook_id: String,
    pub employee_range: Option<String>,
    pub batch_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
