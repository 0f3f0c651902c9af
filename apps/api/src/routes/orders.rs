//! Sales order routes.
//!
//! Non-admin users only ever see their own orders; the owner filter is
//! applied in the query, so a foreign order id answers 404 rather than
//! leaking its existence. Edit and delete additionally require the order
//! to still be pending.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use botica_core::{price_order, CoreError, LineRequest, Medication, Order, OrderStatus};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, FieldError};
use crate::pagination::{PageQuery, Pagination};
use crate::policy::Policy;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderBody {
    #[serde(default, rename = "Motivo")]
    pub reason: Option<String>,
    #[serde(default, rename = "detalles")]
    pub lines: Vec<LineRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderBody {
    #[serde(default, rename = "Situacion")]
    pub status: Option<OrderStatus>,
    #[serde(default, rename = "Motivo")]
    pub reason: Option<String>,
}

/// Non-admins are scoped to their own orders.
fn owner_filter(user: &botica_core::User) -> Option<i32> {
    if user.is_admin() {
        None
    } else {
        Some(user.id)
    }
}

/// `GET /ordenes`
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let paging = query.normalize();

    let (orders, total) = state
        .db
        .orders()
        .list(owner_filter(&user), paging.limit(), paging.offset())
        .await?;

    Ok(Json(json!({
        "ordenes": orders,
        "pagination": Pagination::new(paging, total),
    })))
}

/// `GET /ordenes/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Order>> {
    let order = state
        .db
        .orders()
        .get(id, owner_filter(&user))
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// `POST /ordenes`
///
/// Pricing validates every line before anything is written; the write
/// itself re-checks stock inside the transaction, so two racing orders
/// cannot overdraw a medication.
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateOrderBody>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    if body.lines.is_empty() {
        return Err(ApiError::Validation(vec![FieldError {
            message: "detalles must contain at least one item".to_string(),
            field: "detalles".to_string(),
        }]));
    }

    let medications_repo = state.db.medications();
    let mut items: Vec<(LineRequest, Option<Medication>)> = Vec::with_capacity(body.lines.len());
    for line in &body.lines {
        let medication = medications_repo.get(line.medication_id).await?;
        items.push((line.clone(), medication));
    }

    let priced = price_order(&items)?;

    let order_id = state
        .db
        .orders()
        .create(user.id, body.reason.as_deref(), &priced)
        .await?;

    let mut order = state
        .db
        .orders()
        .get(order_id, None)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("order {order_id} vanished after insert")))?;

    // The create response never carried the owner block.
    order.owner = None;

    info!(order_id, user_id = user.id, total = %priced.total, "Order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// `PUT /ordenes/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateOrderBody>,
) -> ApiResult<Json<Order>> {
    let orders = state.db.orders();

    let existing = orders
        .get(id, None)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Policy::OwnerOrAdmin {
        owner_id: existing.user_id,
    }
    .authorize(&user)
    .map_err(|_| ApiError::Forbidden("Not authorized to edit this order".to_string()))?;

    // A pending order may move to any state; every other state is
    // terminal, so this gate is the whole lifecycle check.
    if !existing.status.is_pending() {
        return Err(CoreError::OrderNotPending {
            id,
            status: existing.status,
        }
        .into());
    }

    orders.update(id, body.status, body.reason.as_deref()).await?;

    let order = orders
        .get(id, None)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    info!(order_id = id, status = ?body.status, "Order updated");

    Ok(Json(order))
}

/// `DELETE /ordenes/{id}`
///
/// Deleting a pending order restores the stock its lines had consumed.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    let orders = state.db.orders();

    let existing = orders
        .get(id, None)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Policy::OwnerOrAdmin {
        owner_id: existing.user_id,
    }
    .authorize(&user)
    .map_err(|_| ApiError::Forbidden("Not authorized to delete this order".to_string()))?;

    if !existing.status.is_pending() {
        return Err(ApiError::BadRequest(
            "Only pending orders can be deleted".to_string(),
        ));
    }

    orders.delete(id).await?;

    info!(order_id = id, "Order deleted");

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_uses_legacy_field_names() {
        let body: CreateOrderBody = serde_json::from_str(
            r#"{"Motivo": "Reposición", "detalles": [
                {"CodMedicamento": 4, "cantidadRequerida": 2}
            ]}"#,
        )
        .unwrap();

        assert_eq!(body.reason.as_deref(), Some("Reposición"));
        assert_eq!(body.lines.len(), 1);
        assert_eq!(body.lines[0].medication_id, 4);
        assert_eq!(body.lines[0].quantity, 2);
    }

    #[test]
    fn update_body_fields_are_independent() {
        let body: UpdateOrderBody = serde_json::from_str(r#"{"Situacion": "Aprobada"}"#).unwrap();
        assert_eq!(body.status, Some(OrderStatus::Approved));
        assert!(body.reason.is_none());

        let body: UpdateOrderBody = serde_json::from_str(r#"{"Motivo": "Urgente"}"#).unwrap();
        assert!(body.status.is_none());
        assert_eq!(body.reason.as_deref(), Some("Urgente"));
    }

    #[test]
    fn unknown_status_label_is_rejected() {
        let result = serde_json::from_str::<UpdateOrderBody>(r#"{"Situacion": "Cancelada"}"#);
        assert!(result.is_err());
    }
}
