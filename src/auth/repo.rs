use axum::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("email already exists")]
    DuplicateEmail,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Durable user records keyed by username/email. The authentication flow only
/// ever needs existence checks, lookup by username and a single insert.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)"#)
                .bind(username)
                .fetch_one(&self.db)
                .await?;
        Ok(exists.0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&self.db)
                .await?;
        Ok(exists.0)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, full_name, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, full_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, full_name, password_hash, role, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.db)
        .await
        .map_err(map_unique_violation)?;
        Ok(created)
    }
}

// The unique indexes are the authoritative guard against concurrent duplicate
// registration; the orchestrator's pre-checks only provide the friendly error
// on the common path.
fn map_unique_violation(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("users_username_key") => return StoreError::DuplicateUsername,
            Some("users_email_key") => return StoreError::DuplicateEmail,
            _ => {}
        }
    }
    StoreError::Database(e)
}
