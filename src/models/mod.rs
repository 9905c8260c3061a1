//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod company_model;
pub mod ingest_model;
pub mod range_model;
pub mod send_model;
pub mod webhook_model;
