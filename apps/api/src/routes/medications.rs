//! Medication catalog routes.
//!
//! Reads are open to any authenticated user; mutations are admin only.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use botica_core::validation::{validate_description, validate_price, validate_stock};
use botica_core::{Medication, Money};
use botica_db::{MedicationPatch, NewMedication};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, FieldError};
use crate::pagination::{PageQuery, Pagination};
use crate::policy::Policy;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: String,
}

impl ListQuery {
    fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Incoming create body. Field names follow the wire format.
#[derive(Debug, Deserialize)]
pub struct CreateMedicationBody {
    #[serde(default, rename = "descripcionMed")]
    pub description: String,
    #[serde(default, rename = "fechaFabricacion")]
    pub manufactured_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "fechaVencimiento")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "Presentacion")]
    pub presentation: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default, rename = "precioVentaUni")]
    pub unit_price: Option<Money>,
    #[serde(default, rename = "precioVentaPres")]
    pub pack_price: Option<Money>,
    #[serde(default, rename = "CodTipoMed")]
    pub type_id: Option<i32>,
    #[serde(default, rename = "Marca")]
    pub brand: Option<String>,
    #[serde(default, rename = "CodEspec")]
    pub specialty_id: Option<i32>,
}

/// Incoming update body. Every field is optional; an absent field leaves
/// the stored value untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMedicationBody {
    #[serde(default, rename = "descripcionMed")]
    pub description: Option<String>,
    #[serde(default, rename = "fechaFabricacion")]
    pub manufactured_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "fechaVencimiento")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "Presentacion")]
    pub presentation: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default, rename = "precioVentaUni")]
    pub unit_price: Option<Money>,
    #[serde(default, rename = "precioVentaPres")]
    pub pack_price: Option<Money>,
    #[serde(default, rename = "CodTipoMed")]
    pub type_id: Option<i32>,
    #[serde(default, rename = "Marca")]
    pub brand: Option<String>,
    #[serde(default, rename = "CodEspec")]
    pub specialty_id: Option<i32>,
}

impl UpdateMedicationBody {
    fn into_patch(self) -> MedicationPatch {
        MedicationPatch {
            description: self.description,
            manufactured_at: self.manufactured_at,
            expires_at: self.expires_at,
            presentation: self.presentation,
            stock: self.stock,
            unit_price: self.unit_price,
            pack_price: self.pack_price,
            type_id: self.type_id,
            brand: self.brand,
            specialty_id: self.specialty_id,
        }
    }
}

/// `GET /medicamentos`
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let paging = query.paging().normalize();

    let (medications, total) = state
        .db
        .medications()
        .page(&query.search, paging.limit(), paging.offset())
        .await?;

    Ok(Json(json!({
        "medicamentos": medications,
        "pagination": Pagination::new(paging, total),
    })))
}

/// `GET /medicamentos/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Medication>> {
    let medication = state
        .db
        .medications()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Medication not found".to_string()))?;

    Ok(Json(medication))
}

/// `POST /medicamentos`
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateMedicationBody>,
) -> ApiResult<(StatusCode, Json<Medication>)> {
    Policy::AdminOnly.authorize(&user)?;

    let mut errors: Vec<FieldError> = Vec::new();
    if let Err(e) = validate_description(&body.description) {
        errors.push(e.into());
    }
    match body.stock {
        Some(stock) => {
            if let Err(e) = validate_stock(stock) {
                errors.push(e.into());
            }
        }
        None => errors.push(FieldError {
            message: "stock is required".to_string(),
            field: "stock".to_string(),
        }),
    }
    match body.unit_price {
        Some(price) => {
            if let Err(e) = validate_price("precioVentaUni", price) {
                errors.push(e.into());
            }
        }
        None => errors.push(FieldError {
            message: "precioVentaUni is required".to_string(),
            field: "precioVentaUni".to_string(),
        }),
    }
    if let Some(price) = body.pack_price {
        if let Err(e) = validate_price("precioVentaPres", price) {
            errors.push(e.into());
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let new = NewMedication {
        description: body.description.trim().to_string(),
        manufactured_at: body.manufactured_at,
        expires_at: body.expires_at,
        presentation: body.presentation,
        // Checked above; the fallbacks never apply.
        stock: body.stock.unwrap_or(0),
        unit_price: body.unit_price.unwrap_or(Money::zero()),
        pack_price: body.pack_price,
        type_id: body.type_id,
        brand: body.brand,
        specialty_id: body.specialty_id,
    };

    let medication = state.db.medications().insert(&new).await?;

    info!(medication_id = medication.id, "Medication created");

    Ok((StatusCode::CREATED, Json(medication)))
}

/// `PUT /medicamentos/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateMedicationBody>,
) -> ApiResult<Json<Medication>> {
    Policy::AdminOnly.authorize(&user)?;

    let mut errors: Vec<FieldError> = Vec::new();
    if let Some(ref description) = body.description {
        if let Err(e) = validate_description(description) {
            errors.push(e.into());
        }
    }
    if let Some(stock) = body.stock {
        if let Err(e) = validate_stock(stock) {
            errors.push(e.into());
        }
    }
    if let Some(price) = body.unit_price {
        if let Err(e) = validate_price("precioVentaUni", price) {
            errors.push(e.into());
        }
    }
    if let Some(price) = body.pack_price {
        if let Err(e) = validate_price("precioVentaPres", price) {
            errors.push(e.into());
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let medication = state.db.medications().update(id, &body.into_patch()).await?;

    info!(medication_id = id, "Medication updated");

    Ok(Json(medication))
}

/// `DELETE /medicamentos/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    Policy::AdminOnly.authorize(&user)?;

    state.db.medications().delete(id).await?;

    info!(medication_id = id, "Medication deleted");

    Ok(Json(json!({ "message": "Medication deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_tracks_field_presence() {
        let body: UpdateMedicationBody = serde_json::from_str(r#"{"stock": 5}"#).unwrap();

        assert_eq!(body.stock, Some(5));
        assert!(body.description.is_none());
        assert!(body.unit_price.is_none());

        let patch = body.into_patch();
        assert_eq!(patch.stock, Some(5));
        assert!(patch.description.is_none());
    }

    #[test]
    fn update_body_accepts_prices_as_decimals() {
        let body: UpdateMedicationBody =
            serde_json::from_str(r#"{"precioVentaUni": 5.50}"#).unwrap();
        assert_eq!(body.unit_price, Some(Money::from_cents(550)));
    }

    #[test]
    fn create_body_defaults_optional_fields() {
        let body: CreateMedicationBody = serde_json::from_str(
            r#"{"descripcionMed": "Paracetamol 500mg", "stock": 10, "precioVentaUni": 2.5}"#,
        )
        .unwrap();

        assert_eq!(body.description, "Paracetamol 500mg");
        assert_eq!(body.unit_price, Some(Money::from_cents(250)));
        assert!(body.brand.is_none());
        assert!(body.type_id.is_none());
    }
}
