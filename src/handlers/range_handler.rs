//! handlers/range_handler.rs
use actix_web::HttpResponse;

use crate::models::range_model::RangesResponse;
use crate::services::range_service::{range_capacities, SAFE_PEOPLE_LIMIT};

/// GET /api/ranges
/// Tabla de rangos con la capacidad por webhook ya calculada.
pub async fn list_ranges_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(RangesResponse {
        safe_limit: SAFE_PEOPLE_LIMIT,
        ranges: range_capacities(),
    })
}
