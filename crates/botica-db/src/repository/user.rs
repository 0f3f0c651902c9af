//! User repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use botica_core::{Role, User};

use crate::error::{DbError, DbResult};

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub given_name: String,
    pub family_name: String,
    pub role: Role,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: i32,
    email: String,
    password_hash: String,
    given_name: String,
    family_name: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn into_user(self) -> DbResult<User> {
        let role: Role = self
            .role
            .parse()
            .map_err(|e| DbError::Internal(format!("user {}: {}", self.id, e)))?;

        Ok(User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            given_name: self.given_name,
            family_name: self.family_name,
            role,
            active: self.active,
            created_at: self.created_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, given_name, family_name, role, active, created_at";

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        UserRepository { pool }
    }

    /// Looks a user up by email, active or not. Login decides what an
    /// inactive match means.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        record.map(UserRecord::into_user).transpose()
    }

    /// Looks a user up by id (token subject resolution).
    pub async fn find_by_id(&self, id: i32) -> DbResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(UserRecord::into_user).transpose()
    }

    /// Inserts a new user. A duplicate email surfaces as
    /// [`DbError::UniqueViolation`].
    pub async fn insert(&self, new: &NewUser) -> DbResult<User> {
        debug!(email = %new.email, "Inserting user");

        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, password_hash, given_name, family_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.given_name)
        .bind(&new.family_name)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        record.into_user()
    }
}
