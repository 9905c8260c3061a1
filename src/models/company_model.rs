//! models/company_model.rs
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fila de la tabla `companies`. Este servicio no la modifica.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: String,
    pub company_name: String,
    pub company_domain: Option<String>,
    pub company_linkedin_url: Option<String>,
    pub full_description: Option<String>,
    pub short_description: Option<String>,
    pub employee_range: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// GET /api/companies?employee_range=..&exclude_sent=..&limit=..&offset=..
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyListQuery {
    pub employee_range: Option<String>,
    /// Solo "true" activa la exclusión; cualquier otro valor equivale a false.
    pub exclude_sent: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl CompanyListQuery {
    pub fn excludes_sent(&self) -> bool {
        self.exclude_sent.as_deref() == Some("true")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<Company>,
    pub total: i64,
}

/// POST /api/companies  { "action": "counts" }
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyActionRequest {
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeCountsResponse {
    pub counts: BTreeMap<String, i64>,
    pub sent_counts: BTreeMap<String, i64>,
}
