//! Repository implementations.
//!
//! Each repository owns a pool clone and exposes async methods returning
//! `DbResult`. Record structs (`FromRow`) stay private to their module;
//! public APIs speak `botica-core` types.

pub mod lookup;
pub mod medication;
pub mod order;
pub mod user;
