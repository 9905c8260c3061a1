use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use crate::config::AppConfig;
use crate::logger::init_logger;
use crate::services::company_service::CompanyService;
use crate::services::dispatch_service::DispatchService;
use crate::services::ingest_service::IngestService;
use crate::services::send_record_service::SendRecordService;
use crate::services::webhook_service::WebhookService;

mod app;
mod config;
mod db;
mod errors;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env().expect("Configuración inválida");

    // Conectarnos a la DB y migrar
    let db_pool = db::connect(&config.database_url)
        .await
        .expect("No se pudo conectar a la base de datos SQLite.");
    if let Err(e) = db::run_migrations(&db_pool).await {
        panic!("Fallo en migraciones: {:?}", e);
    }

    let send_record_service = SendRecordService::new(db_pool.clone());
    let company_service = CompanyService::new(db_pool.clone(), send_record_service.clone());
    let webhook_service = WebhookService::new(db_pool.clone());
    let ingest_service = IngestService::new(db_pool.clone(), config.ingest_audit_log);
    let dispatch_service = DispatchService::new(
        company_service.clone(),
        send_record_service.clone(),
        config.dispatch.clone(),
    )
    .expect("No se pudo inicializar DispatchService");

    log::info!(
        "Levantando servidor en {}:{} (sub-lote={}, pausa={}ms)",
        config.host,
        config.port,
        config.dispatch.sub_batch_size,
        config.dispatch.interval_ms
    );
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(send_record_service.clone()))
            .app_data(web::Data::new(company_service.clone()))
            .app_data(web::Data::new(webhook_service.clone()))
            .app_data(web::Data::new(ingest_service.clone()))
            .app_data(web::Data::new(dispatch_service.clone()))
            .configure(app::init_app)
    });
    if let Some(workers) = config.http_workers {
        server = server.workers(workers);
    }

    server.bind((config.host.as_str(), config.port))?.run().await
}
