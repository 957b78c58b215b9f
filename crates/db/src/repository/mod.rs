//! Repository layer: store traits, PostgreSQL implementations, and the
//! combined database context.
//!
//! # Error Handling
//!
//! All repository methods return `Result<T, AppError>` where errors are:
//! - `AppError::Internal` - Database connection or query failures
//! - `AppError::Conflict` - Unique constraint violations (duplicate email)
//!
//! Missing records are reported as `Ok(None)`; callers decide how to surface
//! them.
//!
//! # Ownership
//!
//! Every contact primitive takes the owner id and filters on it inside the
//! store. There is no way to read, update or delete a contact by id alone.

mod config;
mod contact;
mod user;

use std::sync::Arc;

use async_trait::async_trait;
use contacts_core::AppError;
use sqlx::postgres::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::memory::MemoryStore;
use crate::{Contact, CreateContactParams, CreateUserParams, UpdateContactParams, User};

pub use config::{DbConfig, create_pool, run_migrations};
pub use contact::ContactRepository;
pub use user::UserRepository;

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by canonical email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user.
    ///
    /// Returns `AppError::Conflict` if the email is already registered.
    async fn create(&self, params: CreateUserParams<'_>) -> Result<User, AppError>;
}

/// Contact store. Every operation is scoped to one owner.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts of `owner`, oldest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Contact>, AppError>;

    /// Insert a new contact for `params.user_id`.
    async fn create(&self, params: CreateContactParams<'_>) -> Result<Contact, AppError>;

    /// Merge `changes` into the contact matching both `id` and `owner`.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: UpdateContactParams<'_>,
    ) -> Result<Option<Contact>, AppError>;

    /// Remove the contact matching both `id` and `owner`, returning it.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError>;
}

#[derive(Clone)]
enum Backend {
    Postgres(PgPool),
    Memory,
}

/// Combined database context.
///
/// Constructed once at startup and closed explicitly at shutdown.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn UserStore>,
    pub contacts: Arc<dyn ContactStore>,
    backend: Backend,
}

impl Database {
    /// Connect to PostgreSQL, apply migrations, and build the repositories.
    pub async fn connect(config: &DbConfig) -> Result<Self, AppError> {
        let pool = create_pool(config).await?;
        run_migrations(&pool).await?;
        info!("Connected to database");
        Ok(Self::postgres(pool))
    }

    /// Creates a database context over an existing pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            contacts: Arc::new(ContactRepository::new(pool.clone())),
            backend: Backend::Postgres(pool),
        }
    }

    /// Creates a process-local database context (development and tests).
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            contacts: store,
            backend: Backend::Memory,
        }
    }

    /// Backend name for logs and readiness output.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }

    /// Check database health by executing a simple query.
    pub async fn health_check(&self) -> bool {
        match &self.backend {
            Backend::Postgres(pool) => sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(pool)
                .await
                .is_ok(),
            Backend::Memory => true,
        }
    }

    /// Close the underlying connections.
    pub async fn close(&self) {
        if let Backend::Postgres(pool) = &self.backend {
            pool.close().await;
            info!("Database connections closed");
        }
    }
}
