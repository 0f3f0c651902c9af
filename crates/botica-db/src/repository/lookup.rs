//! Lookup table repository.
//!
//! Medication types and specialties are small read-only reference tables
//! consumed by catalog forms.

use sqlx::PgPool;

use botica_core::{MedicationType, Specialty};

use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct LookupRecord {
    id: i32,
    description: String,
}

/// Repository for reference tables.
#[derive(Debug, Clone)]
pub struct LookupRepository {
    pool: PgPool,
}

impl LookupRepository {
    pub fn new(pool: PgPool) -> Self {
        LookupRepository { pool }
    }

    /// All medical specialties, alphabetically.
    pub async fn specialties(&self) -> DbResult<Vec<Specialty>> {
        let records = sqlx::query_as::<_, LookupRecord>(
            "SELECT id, description FROM specialties ORDER BY description",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| Specialty {
                id: r.id,
                description: r.description,
            })
            .collect())
    }

    /// All medication types, alphabetically.
    pub async fn medication_types(&self) -> DbResult<Vec<MedicationType>> {
        let records = sqlx::query_as::<_, LookupRecord>(
            "SELECT id, description FROM medication_types ORDER BY description",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| MedicationType {
                id: r.id,
                description: r.description,
            })
            .collect())
    }
}
