//! Service-specific utilities.

pub mod password;
