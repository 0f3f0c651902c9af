//! Medication repository.
//!
//! All reads join the lookup tables so responses carry the nested
//! `tipoMedic` / `especialidad` objects the legacy API exposed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use botica_core::{Medication, MedicationType, Money, Specialty};

use crate::error::{DbError, DbResult};

/// Fields required to insert a medication.
#[derive(Debug, Clone)]
pub struct NewMedication {
    pub description: String,
    pub manufactured_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub presentation: Option<String>,
    pub stock: i32,
    pub unit_price: Money,
    pub pack_price: Option<Money>,
    pub type_id: Option<i32>,
    pub brand: Option<String>,
    pub specialty_id: Option<i32>,
}

/// Partial update: `None` leaves the column unchanged.
///
/// Presence, not nullability, drives the update; a field absent from the
/// request body never touches its column.
#[derive(Debug, Clone, Default)]
pub struct MedicationPatch {
    pub description: Option<String>,
    pub manufactured_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub presentation: Option<String>,
    pub stock: Option<i32>,
    pub unit_price: Option<Money>,
    pub pack_price: Option<Money>,
    pub type_id: Option<i32>,
    pub brand: Option<String>,
    pub specialty_id: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
struct MedicationRecord {
    id: i32,
    description: String,
    manufactured_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    presentation: Option<String>,
    stock: i32,
    unit_price_cents: i64,
    pack_price_cents: Option<i64>,
    type_id: Option<i32>,
    brand: Option<String>,
    specialty_id: Option<i32>,
    created_at: DateTime<Utc>,
    type_description: Option<String>,
    specialty_description: Option<String>,
}

impl From<MedicationRecord> for Medication {
    fn from(r: MedicationRecord) -> Self {
        let medication_type = match (r.type_id, r.type_description) {
            (Some(id), Some(description)) => Some(MedicationType { id, description }),
            _ => None,
        };
        let specialty = match (r.specialty_id, r.specialty_description) {
            (Some(id), Some(description)) => Some(Specialty { id, description }),
            _ => None,
        };

        Medication {
            id: r.id,
            description: r.description,
            manufactured_at: r.manufactured_at,
            expires_at: r.expires_at,
            presentation: r.presentation,
            stock: r.stock,
            unit_price: Money::from_cents(r.unit_price_cents),
            pack_price: r.pack_price_cents.map(Money::from_cents),
            type_id: r.type_id,
            brand: r.brand,
            specialty_id: r.specialty_id,
            created_at: r.created_at,
            medication_type,
            specialty,
        }
    }
}

const JOINED_SELECT: &str = r#"
    SELECT m.id, m.description, m.manufactured_at, m.expires_at, m.presentation,
           m.stock, m.unit_price_cents, m.pack_price_cents, m.type_id, m.brand,
           m.specialty_id, m.created_at,
           t.description AS type_description,
           s.description AS specialty_description
    FROM medications m
    LEFT JOIN medication_types t ON t.id = m.type_id
    LEFT JOIN specialties s ON s.id = m.specialty_id
"#;

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Repository for catalog medications.
#[derive(Debug, Clone)]
pub struct MedicationRepository {
    pool: PgPool,
}

impl MedicationRepository {
    pub fn new(pool: PgPool) -> Self {
        MedicationRepository { pool }
    }

    /// Returns one page of medications plus the total row count.
    ///
    /// A non-empty `search` matches description or brand as a
    /// case-insensitive substring. Newest-created rows come first.
    pub async fn page(
        &self,
        search: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<(Vec<Medication>, i64)> {
        let search = search.trim();
        debug!(search = %search, limit, offset, "Listing medications");

        let (records, total) = if search.is_empty() {
            let records = sqlx::query_as::<_, MedicationRecord>(&format!(
                "{JOINED_SELECT} ORDER BY m.created_at DESC LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medications")
                .fetch_one(&self.pool)
                .await?;

            (records, total)
        } else {
            let pattern = format!("%{}%", escape_like(search));

            let records = sqlx::query_as::<_, MedicationRecord>(&format!(
                r#"{JOINED_SELECT}
                WHERE m.description ILIKE $1 OR m.brand ILIKE $1
                ORDER BY m.created_at DESC LIMIT $2 OFFSET $3"#
            ))
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM medications m WHERE m.description ILIKE $1 OR m.brand ILIKE $1",
            )
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

            (records, total)
        };

        Ok((records.into_iter().map(Medication::from).collect(), total))
    }

    /// Gets a medication by id, joined with its lookup rows.
    pub async fn get(&self, id: i32) -> DbResult<Option<Medication>> {
        let record = sqlx::query_as::<_, MedicationRecord>(&format!(
            "{JOINED_SELECT} WHERE m.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Medication::from))
    }

    /// Inserts a medication and returns the joined row.
    pub async fn insert(&self, new: &NewMedication) -> DbResult<Medication> {
        debug!(description = %new.description, "Inserting medication");

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO medications (
                description, manufactured_at, expires_at, presentation,
                stock, unit_price_cents, pack_price_cents,
                type_id, brand, specialty_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&new.description)
        .bind(new.manufactured_at)
        .bind(new.expires_at)
        .bind(&new.presentation)
        .bind(new.stock)
        .bind(new.unit_price.cents())
        .bind(new.pack_price.map(|p| p.cents()))
        .bind(new.type_id)
        .bind(&new.brand)
        .bind(new.specialty_id)
        .fetch_one(&self.pool)
        .await?;

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Medication", id))
    }

    /// Applies a partial update and returns the joined row.
    pub async fn update(&self, id: i32, patch: &MedicationPatch) -> DbResult<Medication> {
        debug!(id, "Updating medication");

        let result = sqlx::query(
            r#"
            UPDATE medications SET
                description      = COALESCE($2, description),
                manufactured_at  = COALESCE($3, manufactured_at),
                expires_at       = COALESCE($4, expires_at),
                presentation     = COALESCE($5, presentation),
                stock            = COALESCE($6, stock),
                unit_price_cents = COALESCE($7, unit_price_cents),
                pack_price_cents = COALESCE($8, pack_price_cents),
                type_id          = COALESCE($9, type_id),
                brand            = COALESCE($10, brand),
                specialty_id     = COALESCE($11, specialty_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&patch.description)
        .bind(patch.manufactured_at)
        .bind(patch.expires_at)
        .bind(&patch.presentation)
        .bind(patch.stock)
        .bind(patch.unit_price.map(|p| p.cents()))
        .bind(patch.pack_price.map(|p| p.cents()))
        .bind(patch.type_id)
        .bind(&patch.brand)
        .bind(patch.specialty_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medication", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Medication", id))
    }

    /// Deletes a medication.
    pub async fn delete(&self, id: i32) -> DbResult<()> {
        debug!(id, "Deleting medication");

        let result = sqlx::query("DELETE FROM medications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medication", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
