//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers (envío, webhooks, compañías, etc.).
pub mod company_handler;
pub mod ingest_handler;
pub mod range_handler;
pub mod send_handler;
pub mod webhook_handler;
