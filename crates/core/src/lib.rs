//! Core library with shared types and error handling for the contacts service.
//!
//! - Error type with automatic HTTP response conversion
//! - JWT token generation and validation
//! - Authenticated-context extractor for axum handlers
//! - Validation helpers

pub mod error;
pub mod jwt;
pub mod request_ext;
pub mod validation;

pub use error::{AppError, OptionExt, ResultExt};
pub use jwt::{AuthInfo, Claims, JwtError, JwtSubject, JwtValidator};
