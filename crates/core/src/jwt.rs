//! JWT token generation, validation, and claims.
//!
//! Centralizes all JWT handling with a shared validator for encoding and decoding.
//! The encoding/decoding keys are derived once and cached for the lifetime of
//! the application.
//!
//! This module is storage-agnostic: implement `JwtSubject` for your user type.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

/// JWT issuer identifier.
const ISSUER: &str = "contacts-service";
/// JWT audience identifier.
const AUDIENCE: &str = "contacts-service";

/// Trait for types that can be used as JWT subjects.
pub trait JwtSubject {
    /// User's unique identifier.
    fn user_id(&self) -> Uuid;
    /// User's email address.
    fn email(&self) -> &str;
}

/// Validated authentication info from a JWT.
///
/// This is the scope key for every protected operation: handlers receive it
/// explicitly and pass it down to the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    pub user_id: Uuid,
    pub email: String,
}

/// JWT claims structure following RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Audience
    pub aud: String,
    /// Issuer
    pub iss: String,
    /// JWT ID (unique token identifier)
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Not before time (Unix timestamp)
    pub nbf: i64,

    /// User email
    pub email: String,
}

/// JWT validation errors.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("invalid authorization format")]
    InvalidFormat,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("invalid claim: {0}")]
    InvalidClaim(&'static str),
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        Self::Unauthenticated(err.to_string())
    }
}

impl TryFrom<Claims> for AuthInfo {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidClaim("sub"))?,
            email: claims.email,
        })
    }
}

/// Pre-compiled JWT validator with cached encoding/decoding keys.
///
/// Cheap to clone; the keys are shared behind `Arc`.
#[derive(Clone)]
pub struct JwtValidator {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtValidator {
    /// Create a new validator from a secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret_bytes)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret_bytes)),
            validation,
        }
    }

    /// Generate an access token for any type implementing `JwtSubject`.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if encoding fails.
    pub fn generate_access_token<T: JwtSubject>(
        &self,
        subject: &T,
        ttl_minutes: u64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = i64::try_from(ttl_minutes).unwrap_or(i64::MAX / 60);
        let expiration = now + Duration::minutes(ttl);

        let claims = Claims {
            sub: subject.user_id().to_string(),
            aud: AUDIENCE.to_string(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            email: subject.email().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("JWT encoding failed: {e}")))
    }

    /// Validate a JWT and extract auth info.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidToken` for bad signatures, wrong issuer or
    /// audience, and expired tokens.
    pub fn validate(&self, token: &str) -> Result<AuthInfo, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| JwtError::InvalidToken)?;

        token_data.claims.try_into()
    }
}
