//! Persistence layer for users and contacts.
//!
//! Provides:
//! - Store traits ([`UserStore`], [`ContactStore`]) whose contact operations
//!   are always scoped to an owner
//! - PostgreSQL repositories over a SQLx pool, with embedded migrations
//! - An in-memory backend implementing the same traits
//! - The combined [`Database`] context with explicit `connect`/`close`
//!
//! # Example
//!
//! ```ignore
//! use contacts_db::{Database, DbConfig};
//!
//! let db = Database::connect(&DbConfig::from_url("postgres://localhost/contacts")).await?;
//! let contacts = db.contacts.list_by_owner(user_id).await?;
//! db.close().await;
//! ```

mod memory;
mod models;
mod repository;

use contacts_core::AppError;

/// Database error wrapper for ergonomic error conversion.
///
/// Wraps `sqlx::Error` so repository methods convert to `AppError` via `?`.
#[derive(Debug)]
struct DbError(sqlx::Error);

impl From<sqlx::Error> for DbError {
    #[inline]
    fn from(e: sqlx::Error) -> Self {
        Self(e)
    }
}

impl From<DbError> for AppError {
    #[inline]
    fn from(e: DbError) -> Self {
        Self::Internal(format!("Database error: {}", e.0))
    }
}

pub use memory::MemoryStore;
pub use models::{Contact, CreateContactParams, CreateUserParams, UpdateContactParams, User};
pub use repository::{
    ContactRepository, ContactStore, Database, DbConfig, UserRepository, UserStore, create_pool,
    run_migrations,
};
