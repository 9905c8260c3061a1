//! models/ingest_model.rs
//! Registros de personas enriquecidas que llegan de vuelta por POST /api/ingest.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Campos permitidos. Cualquier otro campo (incluido `_batch_metadata`)
/// se descarta al deserializar. Números y booleanos se guardan como texto;
/// objetos, arreglos y null quedan en NULL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub company_domain: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub domain: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub person_linkedin_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub last_experience_title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub last_experience_company: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub last_experience_start_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub company_linkedin_url: Option<String>,
}

impl PersonRecord {
    /// Cadenas vacías se guardan como NULL.
    pub fn normalized(self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }
        PersonRecord {
            first_name: clean(self.first_name),
            last_name: clean(self.last_name),
            full_name: clean(self.full_name),
            company_name: clean(self.company_name),
            company_domain: clean(self.company_domain),
            job_title: clean(self.job_title),
            location: clean(self.location),
            domain: clean(self.domain),
            person_linkedin_url: clean(self.person_linkedin_url),
            last_experience_title: clean(self.last_experience_title),
            last_experience_company: clean(self.last_experience_company),
            last_experience_start_date: clean(self.last_experience_start_date),
            notes: clean(self.notes),
            company_linkedin_url: clean(self.company_linkedin_url),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub inserted: usize,
}

/// Fila de auditoría de `enrichment_logs`.
#[derive(Debug, Clone)]
pub struct NewEnrichmentLog {
    pub batch_id: Option<String>,
    pub records_received: usize,
    pub records_inserted: usize,
    pub status: &'static str, // "success" | "error"
    pub error_message: Option<String>,
    pub source_ip: Option<String>,
}
