//! Database models and parameter types.

use chrono::{DateTime, Utc};
use contacts_core::JwtSubject;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Registered user. The password hash never leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl JwtSubject for User {
    fn user_id(&self) -> Uuid {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }
}

/// Contact owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Parameter types (borrow from caller)
// =============================================================================

/// Parameters for creating a user.
#[derive(Debug, Clone, Copy)]
pub struct CreateUserParams<'a> {
    /// Canonical (trimmed, lowercase) email.
    pub email: &'a str,
    /// Argon2 PHC string.
    pub password_hash: &'a str,
}

/// Parameters for creating a contact.
#[derive(Debug, Clone, Copy)]
pub struct CreateContactParams<'a> {
    pub user_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
}

/// Partial contact update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateContactParams<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
}

impl UpdateContactParams<'_> {
    /// Whether the update carries no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone.is_none()
    }

    /// Apply the provided fields to a contact in place.
    pub fn apply(&self, contact: &mut Contact) {
        if let Some(first_name) = self.first_name {
            contact.first_name = first_name.to_string();
        }
        if let Some(last_name) = self.last_name {
            contact.last_name = last_name.to_string();
        }
        if let Some(phone) = self.phone {
            contact.phone = phone.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        let now = Utc::now();
        Contact {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: "+33123456789".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn contact_serializes_camel_case() {
        let json = serde_json::to_value(contact()).unwrap();
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["lastName"], "Doe");
        assert!(json.get("userId").is_some());
        assert!(json.get("first_name").is_none());
    }

    #[test]
    fn partial_update_only_touches_provided_fields() {
        let mut c = contact();
        let params = UpdateContactParams {
            phone: Some("0999999999"),
            ..Default::default()
        };
        assert!(!params.is_empty());

        params.apply(&mut c);
        assert_eq!(c.phone, "0999999999");
        assert_eq!(c.first_name, "John");
        assert_eq!(c.last_name, "Doe");
    }

    #[test]
    fn empty_update_detected() {
        assert!(UpdateContactParams::default().is_empty());
    }
}
