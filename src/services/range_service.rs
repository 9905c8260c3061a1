//! services/range_service.rs
//! Tabla estática de rangos de empleados y cálculo de capacidad por webhook.

use crate::models::range_model::RangeCapacity;

/// Límite seguro de personas por webhook y lote (40k en vez de 50k, margen).
pub const SAFE_PEOPLE_LIMIT: u32 = 40_000;

/// Máximo estimado cuando el rango no está en la tabla.
pub const DEFAULT_MAX_PER_COMPANY: u32 = 10;

/// Rango que se filtra por coincidencia parcial ("contiene not sure").
pub const NOT_SURE_RANGE: &str = "not sure";

/// Bucket para compañías/envíos sin rango.
pub const UNKNOWN_RANGE: &str = "unknown";

/// Rango -> máximo estimado de personas por compañía.
pub static EMPLOYEE_RANGE_MAX: [(&str, u32); 10] = [
    ("1-10", 10),
    ("11-50", 50),
    ("51-100", 100),
    ("101-250", 250),
    ("251-500", 500),
    ("501-1000", 1000),
    ("1001-5000", 5000),
    ("5001-10000", 10000),
    ("10001+", 15000), // estimado para 10k+
    (NOT_SURE_RANGE, 50000),
];

pub fn known_ranges() -> impl Iterator<Item = &'static str> {
    EMPLOYEE_RANGE_MAX.iter().map(|(range, _)| *range)
}

pub fn estimated_max_per_company(range: &str) -> u32 {
    EMPLOYEE_RANGE_MAX
        .iter()
        .find(|(label, _)| *label == range)
        .map(|(_, max)| *max)
        .unwrap_or(DEFAULT_MAX_PER_COMPANY)
}

/// Cuántas compañías puede recibir un webhook en un lote sin pasar
/// `SAFE_PEOPLE_LIMIT`.
pub fn max_companies_for_range(range: &str) -> usize {
    (SAFE_PEOPLE_LIMIT / estimated_max_per_company(range)) as usize
}

pub fn range_capacities() -> Vec<RangeCapacity> {
    known_ranges()
        .map(|range| RangeCapacity {
            range: range.to_string(),
            estimated_max_per_company: estimated_max_per_company(range),
            max_companies_per_webhook: max_companies_for_range(range),
        })
        .collect()
}
