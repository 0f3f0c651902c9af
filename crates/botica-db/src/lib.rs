//! # botica-db: Database Layer for the Botica Backend
//!
//! PostgreSQL access via sqlx: connection pool, embedded migrations, and
//! one repository per aggregate.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and repository access
//! - [`error`] - Database error types with Postgres constraint mapping
//! - [`repository`] - Repositories (user, medication, lookup, order)
//!
//! Queries are runtime-bound (`sqlx::query_as` + `bind`), fetched into flat
//! `FromRow` record structs and converted into `botica-core` domain types.
//! The only multi-statement writes are the order create/delete
//! transactions; everything else is a single round trip.

pub mod error;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::Database;

pub use repository::lookup::LookupRepository;
pub use repository::medication::{MedicationPatch, MedicationRepository, NewMedication};
pub use repository::order::OrderRepository;
pub use repository::user::{NewUser, UserRepository};
