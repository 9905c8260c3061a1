//! handlers/ingest_handler.rs
//! Endpoint externo que recibe personas enriquecidas.

use actix_web::{http::header::HeaderMap, web, HttpRequest, HttpResponse};

use crate::errors::ApiError;
use crate::models::ingest_model::IngestResponse;
use crate::services::ingest_service::IngestService;

/// IP de origen para auditoría: primer salto de X-Forwarded-For,
/// si no CF-Connecting-IP.
pub fn source_ip(req: &HttpRequest) -> Option<String> {
    let headers = req.headers();
    first_hop(headers, "x-forwarded-for")
        .or_else(|| first_hop(headers, "cf-connecting-ip"))
        .map(str::to_string)
}

fn first_hop<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
}

/// POST /api/ingest
///
/// El cuerpo se recibe crudo: un JSON inválido también deja su fila de
/// auditoría.
pub async fn ingest_endpoint(
    ingest_service: web::Data<IngestService>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let ip = source_ip(&req);
    let inserted = ingest_service.ingest_raw(&body, ip).await?;

    Ok(HttpResponse::Ok().json(IngestResponse {
        success: true,
        inserted,
    }))
}
