//! handlers/send_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::ApiError;
use crate::models::send_model::SendRequest;
use crate::services::dispatch_service::DispatchService;
use crate::services::send_record_service::SendRecordService;

/// POST /api/send
pub async fn send_batch_endpoint(
    dispatch_service: web::Data<DispatchService>,
    body: web::Json<SendRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    log::info!(
        "Entrando a send_batch_endpoint: {} compañías, {} webhooks, range='{}'",
        req.company_ids.len(),
        req.webhooks.len(),
        req.employee_range
    );

    let resp = dispatch_service.send_batch(req).await?;
    Ok(HttpResponse::Ok().json(resp))
}

/// GET /api/send/{batch_id}
pub async fn batch_sends_endpoint(
    send_record_service: web::Data<SendRecordService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let batch_id = path.into_inner();

    let sends = send_record_service
        .list_for_batch(&batch_id)
        .await
        .map_err(|e| ApiError::database("", e))?;

    if sends.is_empty() {
        return Err(ApiError::not_found(format!("Batch {} not found", batch_id)));
    }

    Ok(HttpResponse::Ok().json(json!({
        "batchId": batch_id,
        "sends": sends
    })))
}
