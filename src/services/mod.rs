//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod company_service;
pub mod dispatch_service;
pub mod distribution_service;
pub mod ingest_service;
pub mod range_service;
pub mod send_record_service;
pub mod webhook_service;
