//! # Botica API
//!
//! REST server for the pharmacy backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  HTTP client ───► axum router ───► handlers ───► PostgreSQL             │
//! │                      │                 │                                │
//! │                      ▼                 ▼                                │
//! │                 AuthUser          botica-core                           │
//! │                 extractor        (pricing, rules)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Routes keep the legacy paths (`/auth`, `/medicamentos`, `/ordenes`,
//! `/especialidades`, `/tiposMedicamentos`) and JSON field names, so
//! existing clients keep working against this server.

pub mod auth;
pub mod config;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod routes;

use botica_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
}

impl AppState {
    pub fn new(db: Database, config: &ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
        AppState { db, jwt }
    }
}
