//! config/dispatch_config.rs
//! Parámetros del despachador de webhooks (ritmo, tamaños de lote, etc.)

use std::time::Duration;

/// Configuración del envío a webhooks, con valores por defecto
/// (se puede sobreescribir desde el .env, ver `AppConfig`).
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub sub_batch_size: usize,     // compañías por sub-lote concurrente
    pub interval_ms: u64,          // pausa entre sub-lotes
    pub fetch_chunk_size: usize,   // ids por consulta al leer compañías
    pub request_timeout_secs: u64, // timeout de cada POST saliente
    pub source_tag: String,
    /// Si es true, se guarda "failed" para las compañías cuyo envío falló.
    pub record_delivery_outcome: bool,
}

impl DispatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            sub_batch_size: 10,
            interval_ms: 1000,
            fetch_chunk_size: 100,
            request_timeout_secs: 30,
            source_tag: "hq-data-warehouse".to_string(),
            record_delivery_outcome: false,
        }
    }
}
