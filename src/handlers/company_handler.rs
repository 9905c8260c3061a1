//! handlers/company_handler.rs
use actix_web::{web, HttpResponse};

use crate::errors::ApiError;
use crate::models::company_model::{CompanyActionRequest, CompanyListQuery, RangeCountsResponse};
use crate::services::company_service::CompanyService;

/// GET /api/companies
pub async fn list_companies_endpoint(
    company_service: web::Data<CompanyService>,
    query: web::Query<CompanyListQuery>,
) -> Result<HttpResponse, ApiError> {
    let list = company_service
        .list_companies(&query)
        .await
        .map_err(|e| ApiError::database("", e))?;
    Ok(HttpResponse::Ok().json(list))
}

/// POST /api/companies  {"action": "counts"}
pub async fn company_action_endpoint(
    company_service: web::Data<CompanyService>,
    body: web::Json<CompanyActionRequest>,
) -> Result<HttpResponse, ApiError> {
    match body.action.as_deref() {
        Some("counts") => {
            let counts = company_service
                .range_counts()
                .await
                .map_err(|e| ApiError::database("", e))?;
            let sent_counts = company_service
                .sent_range_counts()
                .await
                .map_err(|e| ApiError::database("", e))?;

            Ok(HttpResponse::Ok().json(RangeCountsResponse {
                counts,
                sent_counts,
            }))
        }
        _ => Err(ApiError::validation("Invalid action")),
    }
}
