//! services/webhook_service.rs
//! CRUD de la configuración de webhooks.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::models::webhook_model::{UpdateWebhookRequest, WebhookRecord};

const WEBHOOK_COLUMNS: &str =
    "id, name, webhook_url, description, employee_range, is_active, created_at, updated_at";

/// Datos ya validados para crear un webhook.
#[derive(Debug, Clone)]
pub struct NewWebhook {
    pub name: String,
    pub webhook_url: String,
    pub description: Option<String>,
    pub employee_range: Option<String>,
}

#[derive(Clone, Debug)]
pub struct WebhookService {
    db_pool: Pool<Sqlite>,
}

impl WebhookService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        WebhookService { db_pool }
    }

    /// Lista webhooks, los más nuevos primero. Opcionalmente filtra por rango.
    pub async fn list_webhooks(&self, employee_range: Option<&str>) -> Result<Vec<WebhookRecord>> {
        let rows = match employee_range {
            Some(range) => {
                sqlx::query_as::<_, WebhookRecord>(&format!(
                    "SELECT {} FROM webhooks WHERE employee_range = ?1 ORDER BY created_at DESC",
                    WEBHOOK_COLUMNS
                ))
                .bind(range)
                .fetch_all(&self.db_pool)
                .await
            }
            None => {
                sqlx::query_as::<_, WebhookRecord>(&format!(
                    "SELECT {} FROM webhooks ORDER BY created_at DESC",
                    WEBHOOK_COLUMNS
                ))
                .fetch_all(&self.db_pool)
                .await
            }
        }
        .context("Error listando webhooks")?;

        Ok(rows)
    }

    pub async fn get_webhook(&self, id: &str) -> Result<Option<WebhookRecord>> {
        let row = sqlx::query_as::<_, WebhookRecord>(&format!(
            "SELECT {} FROM webhooks WHERE id = ?1",
            WEBHOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Error leyendo webhook")?;
        Ok(row)
    }

    /// Crea el webhook activo y lo devuelve tal como quedó en DB.
    pub async fn create_webhook(&self, new: NewWebhook) -> Result<WebhookRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO webhooks (
                id, name, webhook_url, description, employee_range,
                is_active, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(&new.webhook_url)
        .bind(&new.description)
        .bind(&new.employee_range)
        .bind(&now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar webhook")?;

        log::info!(
            "(create_webhook) Webhook '{}' creado con ID={} range={:?}",
            new.name,
            id,
            new.employee_range
        );

        self.get_webhook(&id)
            .await?
            .context("El webhook recién creado no se encontró")
    }

    /// Actualiza solo los campos presentes. Devuelve None si el id no existe.
    pub async fn update_webhook(
        &self,
        id: &str,
        changes: &UpdateWebhookRequest,
    ) -> Result<Option<WebhookRecord>> {
        let now = Utc::now().to_rfc3339();

        let affected = sqlx::query(
            r#"
            UPDATE webhooks
            SET name = COALESCE(?1, name),
                webhook_url = COALESCE(?2, webhook_url),
                description = COALESCE(?3, description),
                employee_range = COALESCE(?4, employee_range),
                is_active = COALESCE(?5, is_active),
                updated_at = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.webhook_url)
        .bind(&changes.description)
        .bind(&changes.employee_range)
        .bind(changes.is_active)
        .bind(&now)
        .bind(id)
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar webhook")?
        .rows_affected();

        if affected == 0 {
            return Ok(None);
        }
        self.get_webhook(id).await
    }

    pub async fn delete_webhook(&self, id: &str) -> Result<u64> {
        let affected = sqlx::query(r#"DELETE FROM webhooks WHERE id = ?1"#)
            .bind(id)
            .execute(&self.db_pool)
            .await
            .context("Fallo al borrar webhook")?
            .rows_affected();
        Ok(affected)
    }

    /// Borra todos los webhooks de un rango.
    pub async fn delete_webhooks_for_range(&self, employee_range: &str) -> Result<u64> {
        let affected = sqlx::query(r#"DELETE FROM webhooks WHERE employee_range = ?1"#)
            .bind(employee_range)
            .execute(&self.db_pool)
            .await
            .context("Fallo al borrar webhooks del rango")?
            .rows_affected();

        log::info!(
            "(delete_webhooks_for_range) range='{}' borrados={}",
            employee_range,
            affected
        );
        Ok(affected)
    }
}
