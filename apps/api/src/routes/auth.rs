//! Authentication routes: register, login, current user.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use botica_core::validation::{validate_email, validate_name, validate_password};
use botica_core::{Role, User};
use botica_db::NewUser;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "nombre")]
    pub given_name: String,
    #[serde(default, rename = "apellido")]
    pub family_name: String,
    #[serde(default, rename = "rol")]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /auth/register`
///
/// Field failures are collected and reported together, not first-only.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let mut errors: Vec<FieldError> = Vec::new();
    for check in [
        validate_email(&body.email),
        validate_password(&body.password),
        validate_name("nombre", &body.given_name),
        validate_name("apellido", &body.family_name),
    ] {
        if let Err(e) = check {
            errors.push(e.into());
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let email = body.email.trim().to_lowercase();

    if state.db.users().find_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let new_user = NewUser {
        email,
        password_hash: hash_password(&body.password)?,
        given_name: body.given_name.trim().to_string(),
        family_name: body.family_name.trim().to_string(),
        role: body.role.unwrap_or_default(),
    };

    let user = state.db.users().insert(&new_user).await?;
    let token = state.jwt.issue_token(&user)?;

    info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "token": token,
            "user": user.public(),
        })),
    ))
}

/// `POST /auth/login`
///
/// Unknown email, deactivated account, and wrong password all answer the
/// same 401 so the response does not reveal which one it was.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut errors: Vec<FieldError> = Vec::new();
    if let Err(e) = validate_email(&body.email) {
        errors.push(e.into());
    }
    if body.password.is_empty() {
        errors.push(FieldError {
            message: "password is required".to_string(),
            field: "password".to_string(),
        });
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let email = body.email.trim().to_lowercase();
    let user = state.db.users().find_by_email(&email).await?;

    let user = check_credentials(user, &body.password)
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let token = state.jwt.issue_token(&user)?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user.public(),
    })))
}

/// `GET /auth/me`
pub async fn me(AuthUser(user): AuthUser) -> Json<serde_json::Value> {
    Json(json!({ "user": user.public() }))
}

/// Accepts the account only when it exists, is active, and the password
/// matches its hash. Each failure mode collapses to `None`, so login
/// answers the same 401 for all of them.
fn check_credentials(user: Option<User>, password: &str) -> Option<User> {
    match user {
        Some(user) if user.active && verify_password(password, &user.password_hash) => Some(user),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use chrono::{TimeZone, Utc};

    fn account(active: bool, password: &str) -> User {
        User {
            id: 1,
            email: "user@pharmacy.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            given_name: "Juan".to_string(),
            family_name: "Pérez".to_string(),
            role: Role::User,
            active,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn valid_credentials_are_accepted() {
        let user = check_credentials(Some(account(true, "user123")), "user123");
        assert!(user.is_some());
    }

    #[test]
    fn inactive_account_is_rejected_even_with_the_right_password() {
        let user = check_credentials(Some(account(false, "user123")), "user123");
        assert!(user.is_none());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let user = check_credentials(Some(account(true, "user123")), "user124");
        assert!(user.is_none());
    }

    #[test]
    fn unknown_account_is_rejected() {
        assert!(check_credentials(None, "user123").is_none());
    }
}
