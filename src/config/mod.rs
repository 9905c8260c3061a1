//! config/mod.rs
//! Configuración del servicio: variables de entorno y constantes de despacho.

pub mod app_config;
pub mod dispatch_config;

pub use app_config::AppConfig;
pub use dispatch_config::DispatchConfig;
