//! handlers/webhook_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::ApiError;
use crate::models::webhook_model::{
    CreateWebhookRequest, UpdateWebhookRequest, WebhookListResponse, WebhookQuery,
    WebhookResponse,
};
use crate::services::webhook_service::{NewWebhook, WebhookService};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/webhooks
pub async fn list_webhooks_endpoint(
    webhook_service: web::Data<WebhookService>,
    query: web::Query<WebhookQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.employee_range.as_deref().filter(|r| !r.is_empty());

    let webhooks = webhook_service
        .list_webhooks(range)
        .await
        .map_err(|e| ApiError::database("", e))?;

    Ok(HttpResponse::Ok().json(WebhookListResponse { webhooks }))
}

/// POST /api/webhooks
pub async fn create_webhook_endpoint(
    webhook_service: web::Data<WebhookService>,
    body: web::Json<CreateWebhookRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();

    let (name, webhook_url) = match (non_blank(req.name), non_blank(req.webhook_url)) {
        (Some(name), Some(url)) => (name, url),
        _ => return Err(ApiError::validation("Name and webhook_url are required")),
    };

    let webhook = webhook_service
        .create_webhook(NewWebhook {
            name,
            webhook_url,
            description: req.description,
            employee_range: non_blank(req.employee_range),
        })
        .await
        .map_err(|e| ApiError::database("", e))?;

    Ok(HttpResponse::Ok().json(WebhookResponse { webhook }))
}

/// PUT /api/webhooks
pub async fn update_webhook_endpoint(
    webhook_service: web::Data<WebhookService>,
    body: web::Json<UpdateWebhookRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    let id = match non_blank(req.id.clone()) {
        Some(id) => id,
        None => return Err(ApiError::validation("ID is required")),
    };

    let updated = webhook_service
        .update_webhook(&id, &req)
        .await
        .map_err(|e| ApiError::database("", e))?;

    match updated {
        Some(webhook) => Ok(HttpResponse::Ok().json(WebhookResponse { webhook })),
        None => Err(ApiError::not_found(format!("Webhook {} not found", id))),
    }
}

/// DELETE /api/webhooks?id=...  ó  DELETE /api/webhooks?employee_range=...
pub async fn delete_webhook_endpoint(
    webhook_service: web::Data<WebhookService>,
    query: web::Query<WebhookQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();

    if let Some(id) = non_blank(query.id) {
        webhook_service
            .delete_webhook(&id)
            .await
            .map_err(|e| ApiError::database("", e))?;
        return Ok(HttpResponse::Ok().json(json!({ "success": true })));
    }

    if let Some(range) = non_blank(query.employee_range) {
        let deleted = webhook_service
            .delete_webhooks_for_range(&range)
            .await
            .map_err(|e| ApiError::database("", e))?;
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "deleted": deleted
        })));
    }

    Err(ApiError::validation("ID is required"))
}
