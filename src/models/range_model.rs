//! models/range_model.rs
use serde::Serialize;

/// Capacidad calculada para un rango de empleados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeCapacity {
    pub range: String,
    pub estimated_max_per_company: u32,
    pub max_companies_per_webhook: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangesResponse {
    pub safe_limit: u32,
    pub ranges: Vec<RangeCapacity>,
}
