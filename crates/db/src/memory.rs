//! Process-local store for development and tests.
//!
//! Mirrors the PostgreSQL schema constraints: unique email, contacts must
//! reference an existing user, and every contact operation filters on owner.
//! Each operation runs under a single lock scope.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::{ContactStore, UserStore};
use crate::{AppError, Contact, CreateContactParams, CreateUserParams, UpdateContactParams, User};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    user_ids_by_email: HashMap<String, Uuid>,
    /// Insertion order is creation order.
    contacts: Vec<Contact>,
}

/// In-memory implementation of both stores.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .user_ids_by_email
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn create(&self, params: CreateUserParams<'_>) -> Result<User, AppError> {
        let mut state = self.state.write().await;

        if state.user_ids_by_email.contains_key(params.email) {
            return Err(AppError::conflict("User", "email"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: params.email.to_string(),
            password_hash: params.password_hash.to_string(),
            created_at: Utc::now(),
        };
        state
            .user_ids_by_email
            .insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Contact>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn create(&self, params: CreateContactParams<'_>) -> Result<Contact, AppError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&params.user_id) {
            return Err(AppError::Internal(format!(
                "contact owner {} does not exist",
                params.user_id
            )));
        }

        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            first_name: params.first_name.to_string(),
            last_name: params.last_name.to_string(),
            phone: params.phone.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.contacts.push(contact.clone());

        Ok(contact)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: UpdateContactParams<'_>,
    ) -> Result<Option<Contact>, AppError> {
        let mut state = self.state.write().await;

        let Some(contact) = state
            .contacts
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
        else {
            return Ok(None);
        };

        changes.apply(contact);
        contact.updated_at = Utc::now();

        Ok(Some(contact.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError> {
        let mut state = self.state.write().await;

        let position = state
            .contacts
            .iter()
            .position(|c| c.id == id && c.user_id == owner);

        Ok(position.map(|index| state.contacts.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user(store: &MemoryStore, email: &str) -> User {
        UserStore::create(
            store,
            CreateUserParams {
                email,
                password_hash: "hash",
            },
        )
        .await
        .unwrap()
    }

    async fn contact(store: &MemoryStore, owner: Uuid, first_name: &str) -> Contact {
        ContactStore::create(
            store,
            CreateContactParams {
                user_id: owner,
                first_name,
                last_name: "Doe",
                phone: "0101010101",
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        user(&store, "a@example.com").await;

        let err = UserStore::create(
            &store,
            CreateUserParams {
                email: "a@example.com",
                password_hash: "other",
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_by_email_returns_created_user() {
        let store = MemoryStore::new();
        let created = user(&store, "a@example.com").await;

        let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn contact_requires_existing_owner() {
        let store = MemoryStore::new();
        let err = ContactStore::create(
            &store,
            CreateContactParams {
                user_id: Uuid::new_v4(),
                first_name: "Ghost",
                last_name: "Owner",
                phone: "0101010101",
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn list_is_scoped_and_ordered() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com").await;
        let b = user(&store, "b@example.com").await;

        contact(&store, a.id, "Jane").await;
        contact(&store, b.id, "Bob").await;
        contact(&store, a.id, "Alice").await;

        let names: Vec<_> = store
            .list_by_owner(a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.first_name)
            .collect();
        assert_eq!(names, ["Jane", "Alice"]);

        let other = store.list_by_owner(b.id).await.unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].first_name, "Bob");
    }

    #[tokio::test]
    async fn update_and_delete_filter_on_owner() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com").await;
        let b = user(&store, "b@example.com").await;
        let mine = contact(&store, a.id, "Mine").await;

        let changes = UpdateContactParams {
            phone: Some("0999999999"),
            ..Default::default()
        };

        assert!(store.update_owned(mine.id, b.id, changes).await.unwrap().is_none());
        assert!(store.delete_owned(mine.id, b.id).await.unwrap().is_none());

        let updated = store
            .update_owned(mine.id, a.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.phone, "0999999999");
        assert!(updated.updated_at >= mine.updated_at);

        let deleted = store.delete_owned(mine.id, a.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, mine.id);
        assert!(store.list_by_owner(a.id).await.unwrap().is_empty());
    }
}
