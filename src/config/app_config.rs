//! config/app_config.rs
//! Lee la configuración desde variables de entorno (cargadas con dotenv).

use std::str::FromStr;

use anyhow::{anyhow, Result};

use super::dispatch_config::DispatchConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite:data/dashboard.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// None = lo que decida actix (uno por CPU)
    pub http_workers: Option<usize>,
    pub dispatch: DispatchConfig,
    pub ingest_audit_log: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda,
    /// para poder probarla sin tocar el entorno del proceso.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DispatchConfig::default();

        let dispatch = DispatchConfig {
            sub_batch_size: parse_or(&lookup, "DISPATCH_SUB_BATCH_SIZE", defaults.sub_batch_size)?,
            interval_ms: parse_or(&lookup, "DISPATCH_INTERVAL_MS", defaults.interval_ms)?,
            fetch_chunk_size: parse_or(
                &lookup,
                "DISPATCH_FETCH_CHUNK_SIZE",
                defaults.fetch_chunk_size,
            )?,
            request_timeout_secs: parse_or(
                &lookup,
                "DISPATCH_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            source_tag: lookup("DISPATCH_SOURCE_TAG").unwrap_or(defaults.source_tag),
            record_delivery_outcome: parse_or(
                &lookup,
                "DISPATCH_RECORD_OUTCOME",
                defaults.record_delivery_outcome,
            )?,
        };

        if dispatch.sub_batch_size == 0 || dispatch.fetch_chunk_size == 0 {
            return Err(anyhow!(
                "DISPATCH_SUB_BATCH_SIZE y DISPATCH_FETCH_CHUNK_SIZE deben ser mayores que 0"
            ));
        }

        let http_workers = match lookup("HTTP_WORKERS") {
            Some(raw) => Some(parse_value("HTTP_WORKERS", &raw)?),
            None => None,
        };

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5022)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            http_workers,
            dispatch,
            ingest_audit_log: parse_or(&lookup, "INGEST_AUDIT_LOG", true)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("Valor inválido para {}='{}': {}", key, raw, e))
}
