//! services/company_service.rs
//! Lectura de compañías: listado paginado, disponibilidad por rango,
//! conteos y carga por ids para el despacho.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Context, Result};
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::models::company_model::{Company, CompanyListQuery, CompanyListResponse};
use crate::services::range_service::{known_ranges, NOT_SURE_RANGE, UNKNOWN_RANGE};
use crate::services::send_record_service::SendRecordService;

const COMPANY_COLUMNS: &str = "id, company_name, company_domain, company_linkedin_url, \
     full_description, short_description, employee_range, city, state, country, notes, \
     created_at, updated_at";

const DEFAULT_PAGE_SIZE: i64 = 100;

/// Filtro por rango de empleados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeFilter {
    /// employee_range IS NULL
    Missing,
    /// "not sure": coincidencia parcial sin distinguir mayúsculas
    NotSure,
    Exact(String),
}

impl RangeFilter {
    pub fn from_label(label: &str) -> Self {
        if label == NOT_SURE_RANGE {
            RangeFilter::NotSure
        } else {
            RangeFilter::Exact(label.to_string())
        }
    }
}

#[derive(Clone, Debug)]
pub struct CompanyService {
    db_pool: Pool<Sqlite>,
    send_record_service: SendRecordService,
}

impl CompanyService {
    pub fn new(db_pool: Pool<Sqlite>, send_record_service: SendRecordService) -> Self {
        CompanyService {
            db_pool,
            send_record_service,
        }
    }

    /// Lista compañías ordenadas por nombre con paginación offset/limit.
    /// `total` es el conteo exacto con los mismos filtros.
    pub async fn list_companies(&self, query: &CompanyListQuery) -> Result<CompanyListResponse> {
        let range = query
            .employee_range
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(RangeFilter::from_label);

        let excluded = if query.excludes_sent() {
            self.send_record_service
                .sent_company_ids()
                .await
                .context("No se pudieron leer los ids ya enviados")?
        } else {
            Vec::new()
        };

        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(0);
        let offset = query.offset.unwrap_or(0).max(0);

        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM companies");
        push_filters(&mut count_qb, range.as_ref(), &excluded);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.db_pool)
            .await
            .context("Error contando companies")?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM companies", COMPANY_COLUMNS));
        push_filters(&mut qb, range.as_ref(), &excluded);
        qb.push(" ORDER BY company_name, id LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let companies = qb
            .build_query_as::<Company>()
            .fetch_all(&self.db_pool)
            .await
            .context("Error listando companies")?;

        log::info!(
            "(list_companies) range={:?} exclude_sent={} excluidos={} total={} devueltos={}",
            range,
            query.excludes_sent(),
            excluded.len(),
            total,
            companies.len()
        );

        Ok(CompanyListResponse { companies, total })
    }

    pub async fn count_companies(&self, range: &RangeFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM companies");
        push_filters(&mut qb, Some(range), &[]);
        let cnt: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.db_pool)
            .await
            .context("Error contando companies por rango")?;
        Ok(cnt)
    }

    /// Conteo por rango conocido más "unknown" (rango NULL).
    pub async fn range_counts(&self) -> Result<BTreeMap<String, i64>> {
        let mut counts = BTreeMap::new();
        for range in known_ranges() {
            let cnt = self.count_companies(&RangeFilter::from_label(range)).await?;
            counts.insert(range.to_string(), cnt);
        }
        let unknown = self.count_companies(&RangeFilter::Missing).await?;
        counts.insert(UNKNOWN_RANGE.to_string(), unknown);
        Ok(counts)
    }

    /// Conteo de envíos con el mismo bucketing que `range_counts`.
    pub async fn sent_range_counts(&self) -> Result<BTreeMap<String, i64>> {
        let mut counts: BTreeMap<String, i64> = known_ranges()
            .chain(std::iter::once(UNKNOWN_RANGE))
            .map(|r| (r.to_string(), 0))
            .collect();

        for (range, cnt) in self.send_record_service.sent_counts_by_range().await? {
            let key = range.unwrap_or_else(|| UNKNOWN_RANGE.to_string());
            *counts.entry(key).or_insert(0) += cnt;
        }
        Ok(counts)
    }

    /// Carga compañías por id en tramos de `chunk_size` (para no armar un
    /// IN gigante) y las devuelve en el orden pedido, sin duplicados.
    /// Los ids que no existen se ignoran.
    pub async fn fetch_by_ids(&self, ids: &[String], chunk_size: usize) -> Result<Vec<Company>> {
        let mut found: HashMap<String, Company> = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(chunk_size.max(1)) {
            let mut qb = QueryBuilder::<Sqlite>::new(format!(
                "SELECT {} FROM companies WHERE id IN (",
                COMPANY_COLUMNS
            ));
            let mut separated = qb.separated(", ");
            for id in chunk {
                separated.push_bind(id.clone());
            }
            separated.push_unseparated(")");

            let rows = qb
                .build_query_as::<Company>()
                .fetch_all(&self.db_pool)
                .await
                .context("Error leyendo companies por id")?;
            for company in rows {
                found.insert(company.id.clone(), company);
            }
        }

        let mut seen: HashSet<&String> = HashSet::with_capacity(found.len());
        let ordered = ids
            .iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| found.remove(id))
            .collect();
        Ok(ordered)
    }
}

/// Agrega el WHERE común. Los ids excluidos van como lista literal de
/// parámetros (`NOT IN (?, ?, ...)`).
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, range: Option<&RangeFilter>, excluded: &[String]) {
    qb.push(" WHERE 1 = 1");

    match range {
        Some(RangeFilter::Missing) => {
            qb.push(" AND employee_range IS NULL");
        }
        Some(RangeFilter::NotSure) => {
            qb.push(" AND LOWER(employee_range) LIKE ");
            qb.push_bind(format!("%{}%", NOT_SURE_RANGE));
        }
        Some(RangeFilter::Exact(label)) => {
            qb.push(" AND employee_range = ");
            qb.push_bind(label.clone());
        }
        None => {}
    }

    if !excluded.is_empty() {
        qb.push(" AND id NOT IN (");
        let mut separated = qb.separated(", ");
        for id in excluded {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");
    }
}
