//! # botica-core: Pure Business Logic for the Botica Backend
//!
//! This crate contains the domain logic of the pharmacy backend as pure
//! functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Botica Architecture                              │
//! │                                                                         │
//! │  HTTP client ──► apps/api (axum handlers, auth, policies)              │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │              ★ botica-core (THIS CRATE) ★                               │
//! │     types • money • order pricing • status machine • validation         │
//! │     NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS                  │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │              botica-db (PostgreSQL repositories)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Medication, Order, lookup tables)
//! - [`money`] - Money type with integer-cents arithmetic (no floating point)
//! - [`order`] - Order pricing: stock validation, snapshots, totals
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Wire Compatibility
//!
//! The HTTP API this crate serves predates the rewrite; its JSON field
//! names are Spanish (`descripcionMed`, `cantidadRequerida`, ...). Types
//! here carry serde renames so the wire format is preserved while the Rust
//! code uses English names.

pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{price_order, LineRequest, PricedLine, PricedOrder};
pub use types::*;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum accepted length for a person's given or family name.
pub const MIN_NAME_LEN: usize = 2;

/// Default page size when a listing request omits `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on `limit` so a single request cannot drain a table.
pub const MAX_PAGE_SIZE: u32 = 100;
