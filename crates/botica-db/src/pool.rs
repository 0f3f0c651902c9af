//! # Database Pool Management
//!
//! PostgreSQL connection pool creation and repository access.
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::connect("postgres://...", 20).await?;
//! db.run_migrations().await?;
//!
//! let page = db.medications().page("", 10, 0).await?;
//! ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::lookup::LookupRepository;
use crate::repository::medication::MedicationRepository;
use crate::repository::order::OrderRepository;
use crate::repository::user::UserRepository;

/// Database handle wrapping the connection pool.
///
/// Cloning is cheap; the pool is internally reference-counted.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects to PostgreSQL.
    pub async fn connect(url: &str, max_connections: u32) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        Ok(Database { pool })
    }

    /// Runs embedded migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations complete");
        Ok(())
    }

    /// Returns the raw connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn medications(&self) -> MedicationRepository {
        MedicationRepository::new(self.pool.clone())
    }

    pub fn lookups(&self) -> LookupRepository {
        LookupRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }
}
