//! Contact repository for PostgreSQL `contacts` operations.
//!
//! Every statement carries `user_id = $owner` in its predicate.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use super::ContactStore;
use crate::{AppError, Contact, CreateContactParams, DbError, UpdateContactParams};

/// Contact repository for PostgreSQL `contacts` operations.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            r"
            SELECT id,
                   user_id,
                   first_name,
                   last_name,
                   phone,
                   created_at,
                   updated_at
              FROM contacts
             WHERE user_id = $1
             ORDER BY created_at, id
            ",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DbError(e).into())
    }

    async fn create(&self, params: CreateContactParams<'_>) -> Result<Contact, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Contact>(
            r"
            INSERT INTO contacts (id, user_id, first_name, last_name, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id,
                      user_id,
                      first_name,
                      last_name,
                      phone,
                      created_at,
                      updated_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(params.user_id)
        .bind(params.first_name)
        .bind(params.last_name)
        .bind(params.phone)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError(e).into())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: UpdateContactParams<'_>,
    ) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            r"
            UPDATE contacts
               SET first_name = COALESCE($3, first_name),
                   last_name = COALESCE($4, last_name),
                   phone = COALESCE($5, phone),
                   updated_at = $6
             WHERE id = $1
               AND user_id = $2
            RETURNING id,
                      user_id,
                      first_name,
                      last_name,
                      phone,
                      created_at,
                      updated_at
            ",
        )
        .bind(id)
        .bind(owner)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.phone)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbError(e).into())
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            r"
            DELETE FROM contacts
             WHERE id = $1
               AND user_id = $2
            RETURNING id,
                      user_id,
                      first_name,
                      last_name,
                      phone,
                      created_at,
                      updated_at
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbError(e).into())
    }
}
