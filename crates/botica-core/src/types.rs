//! # Domain Types
//!
//! Core domain types for the pharmacy backend.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User ──owns──► Order ──owns──► OrderLine ──refs──► Medication          │
//! │                                  (price/description snapshots)          │
//! │                                                                         │
//! │  Medication ──refs──► MedicationType, Specialty (lookup rows)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serde renames map the English field names onto the legacy Spanish wire
//! format (`descripcionMed`, `Situacion`, `cantidadRequerida`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Account role. Admins may mutate the catalog and see every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// Unknown role string, e.g. from a hand-edited database row.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account, including the password hash. Never serialized directly;
/// responses go through [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub given_name: String,
    pub family_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The response-safe projection of this account.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            given_name: self.given_name.clone(),
            family_name: self.family_name.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// User fields that may appear in a response. The password hash has no
/// field here, so it cannot leak by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Lookup Tables
// =============================================================================

/// A medication type reference row (Analgésico, Antibiótico, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationType {
    pub id: i32,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// A medical specialty reference row (Cardiología, Neurología, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i32,
    #[serde(rename = "descripcion")]
    pub description: String,
}

// =============================================================================
// Medication
// =============================================================================

/// A catalog medication, joined with its lookup rows for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: i32,
    #[serde(rename = "descripcionMed")]
    pub description: String,
    #[serde(rename = "fechaFabricacion")]
    pub manufactured_at: Option<DateTime<Utc>>,
    #[serde(rename = "fechaVencimiento")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "Presentacion")]
    pub presentation: Option<String>,
    pub stock: i32,
    #[serde(rename = "precioVentaUni")]
    pub unit_price: Money,
    #[serde(rename = "precioVentaPres")]
    pub pack_price: Option<Money>,
    #[serde(rename = "CodTipoMed")]
    pub type_id: Option<i32>,
    #[serde(rename = "Marca")]
    pub brand: Option<String>,
    #[serde(rename = "CodEspec")]
    pub specialty_id: Option<i32>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "tipoMedic")]
    pub medication_type: Option<MedicationType>,
    #[serde(rename = "especialidad")]
    pub specialty: Option<Specialty>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Order lifecycle.
///
/// `Pending` is the only state in which an order can be edited or deleted;
/// every other state is absorbing. The legacy backend compared against the
/// literal string "Pendiente"; here the lifecycle is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Aprobada")]
    Approved,
    #[serde(rename = "Rechazada")]
    Rejected,
    #[serde(rename = "Atendida")]
    Fulfilled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::Approved => "Aprobada",
            OrderStatus::Rejected => "Rechazada",
            OrderStatus::Fulfilled => "Atendida",
        }
    }

    /// Whether the order may still be edited or deleted. Pending may move
    /// to any state (including staying Pending when only the reason
    /// changes); every other state is terminal.
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string in storage.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseOrderStatusError(pub String);

impl fmt::Display for ParseOrderStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" => Ok(OrderStatus::Pending),
            "Aprobada" => Ok(OrderStatus::Approved),
            "Rechazada" => Ok(OrderStatus::Rejected),
            "Atendida" => Ok(OrderStatus::Fulfilled),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// Owner fields embedded in order responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
    pub email: String,
}

/// A sales order with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    #[serde(rename = "fechaEmision")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "Motivo")]
    pub reason: Option<String>,
    #[serde(rename = "Situacion")]
    pub status: OrderStatus,
    pub total: Money,
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "detalles")]
    pub lines: Vec<OrderLine>,
    #[serde(rename = "usuario", skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSummary>,
}

/// A line item in an order.
///
/// `description` and `unit_price` are snapshots taken when the order was
/// created; later catalog edits do not touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "NroOrdenVta")]
    pub order_id: i32,
    #[serde(rename = "CodMedicamento")]
    pub medication_id: i32,
    #[serde(rename = "descripcionMed")]
    pub description: String,
    #[serde(rename = "cantidadRequerida")]
    pub quantity: i32,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Money,
    pub subtotal: Money,
    #[serde(rename = "medicamento", skip_serializing_if = "Option::is_none")]
    pub medication: Option<Medication>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            id: 1,
            email: "user@pharmacy.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            given_name: "Juan".to_string(),
            family_name: "Pérez".to_string(),
            role: Role::User,
            active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn public_user_never_contains_the_hash() {
        let json = serde_json::to_string(&sample_user().public()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"nombre\":\"Juan\""));
        assert!(json.contains("\"rol\":\"user\""));
    }

    #[test]
    fn role_round_trip() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn only_pending_orders_are_editable() {
        assert!(OrderStatus::Pending.is_pending());

        assert!(!OrderStatus::Approved.is_pending());
        assert!(!OrderStatus::Rejected.is_pending());
        assert!(!OrderStatus::Fulfilled.is_pending());
    }

    #[test]
    fn order_status_uses_legacy_labels() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"Pendiente\""
        );
        assert_eq!("Atendida".parse::<OrderStatus>(), Ok(OrderStatus::Fulfilled));
        assert!("pendiente".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_serializes_with_legacy_field_names() {
        let order = Order {
            id: 9,
            issued_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            reason: Some("Reposición".to_string()),
            status: OrderStatus::Pending,
            total: Money::from_cents(1300),
            user_id: 1,
            lines: vec![OrderLine {
                order_id: 9,
                medication_id: 4,
                description: "Paracetamol 500mg".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(500),
                subtotal: Money::from_cents(1000),
                medication: None,
            }],
            owner: None,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["Situacion"], "Pendiente");
        assert_eq!(json["Motivo"], "Reposición");
        assert_eq!(json["detalles"][0]["cantidadRequerida"], 2);
        assert_eq!(json["detalles"][0]["CodMedicamento"], 4);
        assert!(json.get("usuario").is_none());
    }
}
