//! HTTP service implementations.

pub mod auth;
pub mod contacts;

pub use auth::AuthService;
pub use contacts::ContactService;
