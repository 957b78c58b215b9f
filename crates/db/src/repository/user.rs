//! User repository for PostgreSQL `users` operations.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::{AppError, CreateUserParams, DbError, User};

/// User repository for PostgreSQL `users` operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r"
            SELECT id,
                   email,
                   password_hash,
                   created_at
              FROM users
             WHERE email = $1
             LIMIT 1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbError(e).into())
    }

    async fn create(&self, params: CreateUserParams<'_>) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id,
                      email,
                      password_hash,
                      created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(params.email)
        .bind(params.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("User", "email")
            } else {
                DbError(e).into()
            }
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
