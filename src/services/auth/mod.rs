//! Credential store and token issuer.
//!
//! - `mod.rs` - `AuthService`: register, login, verify
//! - `handlers.rs` - Thin axum handlers for `/auth/*`

mod handlers;

use contacts_core::validation::{
    MAX_PASSWORD_LENGTH, canonical_email, validate_email, validate_password,
};
use contacts_core::{AppError, AuthInfo, JwtValidator};
use contacts_db::{CreateUserParams, Database};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::password;

pub use handlers::routes;

/// Message for every failed login, whichever check failed.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registration, login and token verification.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt: JwtValidator,
    access_token_ttl_minutes: u64,
}

impl AuthService {
    /// Creates a new auth service instance.
    #[must_use]
    pub const fn new(db: Database, jwt: JwtValidator, access_token_ttl_minutes: u64) -> Self {
        Self {
            db,
            jwt,
            access_token_ttl_minutes,
        }
    }

    /// Registers a new user account and returns its id.
    ///
    /// # Errors
    /// - `InvalidArgument` for a malformed email or out-of-range password
    /// - `Conflict` if the email is already registered
    pub async fn register(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        validate_email(email)?;
        validate_password(password)?;

        let email = canonical_email(email);
        info!(email = %email, "Sign up attempt");

        if self.db.users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Registration attempted with existing email");
            return Err(AppError::conflict("User", "email"));
        }

        let password_hash = password::hash(password)?;

        // The unique index still decides concurrent registrations.
        let user = self
            .db
            .users
            .create(CreateUserParams {
                email: &email,
                password_hash: &password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user.id)
    }

    /// Checks credentials and issues an access token.
    ///
    /// # Errors
    /// `Unauthenticated` with the same message for an unknown email and a
    /// wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        if password.chars().count() > MAX_PASSWORD_LENGTH {
            warn!("Login with oversized password");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let email = canonical_email(email);

        let Some(user) = self.db.users.find_by_email(&email).await? else {
            password::verify_dummy(password);
            warn!(email = %email, "Login for unknown email");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        };

        if !password::verify(password, &user.password_hash) {
            warn!(user_id = %user.id, "Invalid password");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .jwt
            .generate_access_token(&user, self.access_token_ttl_minutes)?;

        info!(user_id = %user.id, "Authentication successful");
        Ok(token)
    }

    /// Verifies a token and returns the identity it carries.
    ///
    /// # Errors
    /// `Unauthenticated` for malformed, forged or expired tokens.
    pub fn verify(&self, token: &str) -> Result<AuthInfo, AppError> {
        self.jwt.validate(token).map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn service() -> AuthService {
        let jwt = JwtValidator::new(&SecretString::from("unit_test_secret_key_32_chars!!!"));
        AuthService::new(Database::in_memory(), jwt, 60)
    }

    #[tokio::test]
    async fn register_then_login_yields_verifiable_token() {
        let auth = service();
        let user_id = auth.register("u1@test.com", "password1").await.unwrap();

        let token = auth.login("u1@test.com", "password1").await.unwrap();
        let info = auth.verify(&token).unwrap();

        assert_eq!(info.user_id, user_id);
        assert_eq!(info.email, "u1@test.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let auth = service();
        auth.register("Dup@Test.com", "password1").await.unwrap();

        let err = auth.register("  dup@test.com ", "other-pass").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let auth = service();
        let user_id = auth.register("u1@test.com", "password1").await.unwrap();

        let user = auth
            .db
            .users
            .find_by_email("u1@test.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, user_id);
        assert_ne!(user.password_hash, "password1");
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert!(password::verify("password1", &user.password_hash));
    }

    #[tokio::test]
    async fn concurrent_duplicate_registration_has_one_winner() {
        let auth = service();

        let (a, b) = tokio::join!(
            auth.register("race@test.com", "password1"),
            auth.register("race@test.com", "password2"),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::Conflict(_))))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn oversized_login_password_rejected_as_invalid_credentials() {
        let auth = service();
        auth.register("u1@test.com", "password1").await.unwrap();

        let oversized = "p".repeat(MAX_PASSWORD_LENGTH + 1);
        let err = auth.login("u1@test.com", &oversized).await.unwrap_err();
        let wrong = auth.login("u1@test.com", "nope-nope").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated(_)));
        assert_eq!(err.public_message(), wrong.public_message());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = service();
        auth.register("u1@test.com", "password1").await.unwrap();

        let wrong = auth.login("u1@test.com", "nope-nope").await.unwrap_err();
        let unknown = auth.login("ghost@test.com", "password1").await.unwrap_err();

        assert!(matches!(wrong, AppError::Unauthenticated(_)));
        assert!(matches!(unknown, AppError::Unauthenticated(_)));
        assert_eq!(wrong.public_message(), unknown.public_message());
    }

    #[tokio::test]
    async fn invalid_registration_input_rejected() {
        let auth = service();
        assert!(matches!(
            auth.register("not-an-email", "password1").await,
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            auth.register("u@test.com", "123").await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(matches!(
            service().verify("garbage"),
            Err(AppError::Unauthenticated(_))
        ));
    }
}
