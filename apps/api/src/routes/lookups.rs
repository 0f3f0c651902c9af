//! Reference table routes.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use botica_core::{MedicationType, Specialty};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

/// `GET /especialidades`
pub async fn specialties(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<Vec<Specialty>>> {
    let specialties = state.db.lookups().specialties().await?;
    Ok(Json(specialties))
}

/// `GET /tiposMedicamentos`
pub async fn medication_types(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<Vec<MedicationType>>> {
    let types = state.db.lookups().medication_types().await?;
    Ok(Json(types))
}
