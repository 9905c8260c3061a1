//! app.rs
use crate::errors::ApiError;
use crate::handlers::{
    company_handler, ingest_handler, range_handler, send_handler, webhook_handler,
};
use actix_web::web;

/// Límite del cuerpo (JSON y crudo): las listas de ids pueden ser grandes.
const JSON_LIMIT_BYTES: usize = 16 * 1024 * 1024;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(|err, _req| {
                ApiError::validation(format!("Invalid JSON body: {}", err)).into()
            }),
    )
    .app_data(web::PayloadConfig::new(JSON_LIMIT_BYTES))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::validation(format!("Invalid query string: {}", err)).into()
    }))
    .service(
        web::scope("/api")
            .service(
                web::scope("/send")
                    .route("", web::post().to(send_handler::send_batch_endpoint))
                    .route(
                        "/{batch_id}",
                        web::get().to(send_handler::batch_sends_endpoint),
                    ),
            )
            .service(
                web::scope("/webhooks")
                    .route("", web::get().to(webhook_handler::list_webhooks_endpoint))
                    .route("", web::post().to(webhook_handler::create_webhook_endpoint))
                    .route("", web::put().to(webhook_handler::update_webhook_endpoint))
                    .route(
                        "",
                        web::delete().to(webhook_handler::delete_webhook_endpoint),
                    ),
            )
            .service(
                web::scope("/companies")
                    .route(
                        "",
                        web::get().to(company_handler::list_companies_endpoint),
                    )
                    .route(
                        "",
                        web::post().to(company_handler::company_action_endpoint),
                    ),
            )
            .route("/ranges", web::get().to(range_handler::list_ranges_endpoint))
            .route("/ingest", web::post().to(ingest_handler::ingest_endpoint)),
    );
}
