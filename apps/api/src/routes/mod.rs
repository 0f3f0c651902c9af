//! Route handlers.
//!
//! One module per resource, mirroring the URL layout:
//!
//! - [`auth`] - `/auth/register`, `/auth/login`, `/auth/me`
//! - [`medications`] - `/medicamentos`
//! - [`orders`] - `/ordenes`
//! - [`lookups`] - `/especialidades`, `/tiposMedicamentos`

pub mod auth;
pub mod lookups;
pub mod medications;
pub mod orders;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/especialidades", get(lookups::specialties))
        .route("/tiposMedicamentos", get(lookups::medication_types))
        .route(
            "/medicamentos",
            get(medications::list).post(medications::create),
        )
        .route(
            "/medicamentos/{id}",
            get(medications::get)
                .put(medications::update)
                .delete(medications::delete),
        )
        .route("/ordenes", get(orders::list).post(orders::create))
        .route(
            "/ordenes/{id}",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
