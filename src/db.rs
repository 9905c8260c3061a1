//! db.rs
//! Conexión a SQLite y migraciones.

use std::{path::Path, str::FromStr};

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

/// Conecta al `database_url`, creando el archivo (y su carpeta) si no existe.
pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>> {
    if let Some(dir) = database_dir(database_url) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("No se pudo crear el directorio {}", dir.display()))?;
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("DATABASE_URL inválida: {}", database_url))?
        .create_if_missing(true);

    log::info!("Conectando a SQLite en {}", database_url);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("No se pudo conectar a la base de datos SQLite")?;
    Ok(pool)
}

/// Corre migraciones con sqlx
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Fallo en migraciones")?;
    Ok(())
}

/// Carpeta del archivo de la base, si la URL apunta a un archivo.
fn database_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}
