//! Access-controlled contact service.
//!
//! - `mod.rs` - `ContactService`: list, create, update, delete
//! - `handlers.rs` - Thin axum handlers for `/contacts`
//!
//! Every operation takes the caller's `AuthInfo` and passes its `user_id` to
//! the store as the owner filter. A contact that exists but belongs to someone
//! else is indistinguishable from one that does not exist.

mod handlers;

use contacts_core::validation::{validate_name, validate_phone};
use contacts_core::{AppError, AuthInfo, OptionExt};
use contacts_db::{Contact, CreateContactParams, Database, UpdateContactParams};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

pub use handlers::routes;

/// Entity name used in not found messages.
const CONTACT: &str = "Contact";

/// Body of `POST /contacts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl NewContact {
    fn validate(&self) -> Result<(), AppError> {
        validate_name("firstName", &self.first_name)?;
        validate_name("lastName", &self.last_name)?;
        validate_phone(&self.phone)
    }
}

/// Body of `PATCH /contacts/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl ContactPatch {
    fn validate(&self) -> Result<(), AppError> {
        if self.as_params().is_empty() {
            return Err(AppError::InvalidArgument(
                "At least one of firstName, lastName, phone is required".to_string(),
            ));
        }
        if let Some(first_name) = &self.first_name {
            validate_name("firstName", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_name("lastName", last_name)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }

    fn as_params(&self) -> UpdateContactParams<'_> {
        UpdateContactParams {
            first_name: self.first_name.as_deref().map(str::trim),
            last_name: self.last_name.as_deref().map(str::trim),
            phone: self.phone.as_deref().map(str::trim),
        }
    }
}

/// Contact CRUD scoped to the authenticated caller.
#[derive(Clone)]
pub struct ContactService {
    db: Database,
}

impl ContactService {
    /// Creates a new contact service instance.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// All contacts owned by the caller, oldest first.
    ///
    /// # Errors
    /// `Internal` on store failure.
    pub async fn list(&self, auth: &AuthInfo) -> Result<Vec<Contact>, AppError> {
        let contacts = self.db.contacts.list_by_owner(auth.user_id).await?;
        debug!(user_id = %auth.user_id, count = contacts.len(), "Listed contacts");
        Ok(contacts)
    }

    /// Stores a new contact owned by the caller.
    ///
    /// # Errors
    /// `InvalidArgument` for blank names or a phone outside 10–20 digits.
    pub async fn create(&self, auth: &AuthInfo, input: &NewContact) -> Result<Contact, AppError> {
        input.validate()?;

        let contact = self
            .db
            .contacts
            .create(CreateContactParams {
                user_id: auth.user_id,
                first_name: input.first_name.trim(),
                last_name: input.last_name.trim(),
                phone: input.phone.trim(),
            })
            .await?;

        info!(user_id = %auth.user_id, contact_id = %contact.id, "Contact created");
        Ok(contact)
    }

    /// Merges `patch` into one of the caller's contacts.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty patch or invalid fields
    /// - `NotFound` if the caller owns no contact with this id
    pub async fn update(
        &self,
        auth: &AuthInfo,
        id: Uuid,
        patch: &ContactPatch,
    ) -> Result<Contact, AppError> {
        patch.validate()?;

        let contact = self
            .db
            .contacts
            .update_owned(id, auth.user_id, patch.as_params())
            .await?
            .ok_or_not_found(CONTACT)?;

        info!(user_id = %auth.user_id, contact_id = %id, "Contact updated");
        Ok(contact)
    }

    /// Removes one of the caller's contacts and returns it.
    ///
    /// # Errors
    /// `NotFound` if the caller owns no contact with this id.
    pub async fn delete(&self, auth: &AuthInfo, id: Uuid) -> Result<Contact, AppError> {
        let contact = self
            .db
            .contacts
            .delete_owned(id, auth.user_id)
            .await?
            .ok_or_not_found(CONTACT)?;

        info!(user_id = %auth.user_id, contact_id = %id, "Contact deleted");
        Ok(contact)
    }
}

/// Parse a contact id from the path; malformed ids are reported as missing.
///
/// # Errors
/// `NotFound` if `raw` is not a UUID.
pub fn parse_contact_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(CONTACT))
}
