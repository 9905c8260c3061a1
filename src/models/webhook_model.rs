//! models/webhook_model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WebhookRecord {
    pub id: String,
    pub name: String,
    pub webhook_url: String,
    pub description: Option<String>,
    pub employee_range: Option<String>, // rango para el que se usa este webhook
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un webhook
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWebhookRequest {
    pub name: Option<String>,
    pub webhook_url: Option<String>,
    pub description: Option<String>,
    pub employee_range: Option<String>,
}

/// Request para actualizar un webhook. Solo cambian los campos presentes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWebhookRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub webhook_url: Option<String>,
    pub description: Option<String>,
    pub employee_range: Option<String>,
    pub is_active: Option<bool>,
}

/// Query string para GET y DELETE /api/webhooks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookQuery {
    pub id: Option<String>,
    pub employee_range: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub webhook: WebhookRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookListResponse {
    pub webhooks: Vec<WebhookRecord>,
}
