//! errors.rs
//! Errores que devuelven los handlers. Cada variante se traduce a un
//! código HTTP y a un cuerpo `{"error": "..."}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Faltan campos o el payload no es válido. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Fallo de lectura/escritura en la base de datos. HTTP 500,
    /// el mensaje del error se devuelve al cliente.
    #[error("{0}")]
    Database(String),

    /// Cualquier otra cosa inesperada. HTTP 500.
    #[error("Server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Envuelve un error de servicio, anteponiendo un prefijo opcional
    /// (p.e. "Failed to record sends: ").
    pub fn database(prefix: &str, err: anyhow::Error) -> Self {
        ApiError::Database(format!("{}{:#}", prefix, err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::database("", anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_keep_the_underlying_cause() {
        let err = ApiError::database(
            "Failed to record sends: ",
            anyhow!("disk I/O error").context("Error insertando company_sends"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to record sends: Error insertando company_sends: disk I/O error"
        );

        let err = ApiError::from(anyhow!("unexpected"));
        assert_eq!(err.to_string(), "Server error: unexpected");
    }
}
