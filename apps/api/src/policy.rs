//! Access policies for protected operations.
//!
//! Every mutating handler names its policy as a value and authorizes
//! against the authenticated user, so the access rule for an endpoint is
//! visible at the call site instead of being scattered across middleware.

use botica_core::User;

use crate::error::ApiError;

/// What a protected operation requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Any authenticated user.
    NoneRequired,

    /// Admin role only (catalog mutations).
    AdminOnly,

    /// The order's owner or an admin.
    OwnerOrAdmin { owner_id: i32 },
}

impl Policy {
    /// Checks the policy against a user, returning 403 on failure.
    pub fn authorize(&self, user: &User) -> Result<(), ApiError> {
        match self {
            Policy::NoneRequired => Ok(()),

            Policy::AdminOnly => {
                if user.is_admin() {
                    Ok(())
                } else {
                    Err(ApiError::Forbidden("Admin access required".to_string()))
                }
            }

            Policy::OwnerOrAdmin { owner_id } => {
                if user.is_admin() || user.id == *owner_id {
                    Ok(())
                } else {
                    Err(ApiError::Forbidden(
                        "Not authorized to access this order".to_string(),
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botica_core::Role;
    use chrono::{TimeZone, Utc};

    fn user(id: i32, role: Role) -> User {
        User {
            id,
            email: format!("u{id}@pharmacy.com"),
            password_hash: String::new(),
            given_name: "Test".to_string(),
            family_name: "User".to_string(),
            role,
            active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn none_required_admits_everyone() {
        assert!(Policy::NoneRequired.authorize(&user(1, Role::User)).is_ok());
    }

    #[test]
    fn admin_only_rejects_regular_users() {
        assert!(Policy::AdminOnly.authorize(&user(1, Role::Admin)).is_ok());

        let err = Policy::AdminOnly.authorize(&user(2, Role::User)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(err.to_string(), "Admin access required");
    }

    #[test]
    fn owner_or_admin_admits_the_owner_and_admins() {
        let policy = Policy::OwnerOrAdmin { owner_id: 5 };

        assert!(policy.authorize(&user(5, Role::User)).is_ok());
        assert!(policy.authorize(&user(9, Role::Admin)).is_ok());
        assert!(policy.authorize(&user(6, Role::User)).is_err());
    }
}
