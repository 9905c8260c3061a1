//! tests/mod.rs
//! Utilidades compartidas por las pruebas: base en memoria, datos de
//! ejemplo y un receptor HTTP local que hace de webhook.

mod dispatch_tests;

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::config::DispatchConfig;
use crate::db;

/// SQLite en memoria con las migraciones reales. Una sola conexión que no
/// expira, si no cada conexión vería una base distinta.
pub async fn test_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .expect("No se pudo abrir SQLite en memoria");
    db::run_migrations(&pool)
        .await
        .expect("Fallaron las migraciones");
    pool
}

pub async fn seed_company(pool: &Pool<Sqlite>, id: &str, name: &str, range: Option<&str>) {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO companies (
            id, company_name, company_domain, company_linkedin_url,
            full_description, short_description, employee_range,
            city, state, country, notes, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, NULL, NULL, NULL, ?4, 'Austin', 'TX', 'US', NULL, ?5, ?5)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(format!("{}.example.com", id))
    .bind(range)
    .bind(&now)
    .execute(pool)
    .await
    .expect("No se pudo insertar la compañía de prueba");
}

/// Inserta `n` compañías "c01".."cNN" con el rango dado y devuelve sus ids.
pub async fn seed_companies(pool: &Pool<Sqlite>, n: usize, range: Option<&str>) -> Vec<String> {
    let mut ids = Vec::with_capacity(n);
    for i in 1..=n {
        let id = format!("c{:02}", i);
        seed_company(pool, &id, &format!("Company {:02}", i), range).await;
        ids.push(id);
    }
    ids
}

/// Config de despacho con pausas cortas para no alargar las pruebas.
pub fn fast_dispatch_config() -> DispatchConfig {
    DispatchConfig {
        interval_ms: 20,
        request_timeout_secs: 5,
        ..DispatchConfig::default()
    }
}

/// Receptor local: POST /ok responde 200, POST /fail responde 500.
/// Guarda todos los cuerpos recibidos.
pub struct Receiver {
    pub addr: SocketAddr,
    pub hits: web::Data<Mutex<Vec<Value>>>,
    handle: ServerHandle,
}

impl Receiver {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn received(&self) -> Vec<Value> {
        self.hits.lock().expect("mutex envenenado").clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn receive_ok(hits: web::Data<Mutex<Vec<Value>>>, body: web::Json<Value>) -> HttpResponse {
    hits.lock().expect("mutex envenenado").push(body.into_inner());
    HttpResponse::Ok().finish()
}

async fn receive_fail(hits: web::Data<Mutex<Vec<Value>>>, body: web::Json<Value>) -> HttpResponse {
    hits.lock().expect("mutex envenenado").push(body.into_inner());
    HttpResponse::InternalServerError().finish()
}

pub async fn start_receiver() -> Receiver {
    let hits = web::Data::new(Mutex::new(Vec::new()));
    let app_hits = hits.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_hits.clone())
            .route("/ok", web::post().to(receive_ok))
            .route("/fail", web::post().to(receive_fail))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("No se pudo abrir el receptor");

    let addr = server.addrs()[0];
    let running = server.run();
    let handle = running.handle();
    actix_rt::spawn(running);

    Receiver { addr, hits, handle }
}
