//! Request validation helpers.
//!
//! Domain-level rules for registration and contact payloads. Each helper
//! returns `AppError::InvalidArgument` naming the offending field.

use crate::AppError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum password length (bounds hashing cost).
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 255;
/// Maximum length of a contact first or last name.
pub const MAX_NAME_LENGTH: usize = 100;
/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;
/// Maximum number of digits in a phone number.
pub const MAX_PHONE_DIGITS: usize = 20;
/// Maximum raw length of a phone number, formatting included.
pub const MAX_PHONE_LENGTH: usize = 32;

/// Non-digit characters accepted as phone formatting.
const PHONE_FORMATTING: &[char] = &['+', ' ', '-', '.', '(', ')'];

fn field_violation(field: &str, description: impl Into<String>) -> AppError {
    AppError::InvalidArgument(format!("{field}: {}", description.into()))
}

/// Normalize an email for storage and lookup (trimmed, lowercase).
#[must_use]
pub fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format (basic structural check).
///
/// # Errors
/// Returns `AppError::InvalidArgument` if the email is malformed or too long.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(field_violation("email", "Email is required"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(field_violation(
            "email",
            format!("Email must not exceed {MAX_EMAIL_LENGTH} characters"),
        ));
    }

    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    });
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(field_violation("email", "Invalid email format"));
    }

    Ok(())
}

/// Validate password length.
///
/// # Errors
/// Returns `AppError::InvalidArgument` if the password is too short or too long.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LENGTH {
        return Err(field_violation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }

    if len > MAX_PASSWORD_LENGTH {
        return Err(field_violation(
            "password",
            format!("Password must not exceed {MAX_PASSWORD_LENGTH} characters"),
        ));
    }

    Ok(())
}

/// Validate a contact name field (non-blank, bounded length).
///
/// # Errors
/// Returns `AppError::InvalidArgument` if the name is blank or too long.
pub fn validate_name(field: &str, name: &str) -> Result<(), AppError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(field_violation(field, "Value is required"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(field_violation(
            field,
            format!("Value must not exceed {MAX_NAME_LENGTH} characters"),
        ));
    }

    Ok(())
}

/// Count the decimal digits of a phone number, ignoring formatting.
#[must_use]
pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

/// Validate a phone number by its digit count.
///
/// Formatting characters (`+`, spaces, dashes, dots, parentheses) are allowed
/// and ignored; the stored value is kept as entered.
///
/// # Errors
/// Returns `AppError::InvalidArgument` if the value is longer than
/// `MAX_PHONE_LENGTH`, contains other characters, or its digit count is
/// outside `MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS`.
pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    let phone = phone.trim();

    if phone.chars().count() > MAX_PHONE_LENGTH {
        return Err(field_violation(
            "phone",
            format!("Phone number must not exceed {MAX_PHONE_LENGTH} characters"),
        ));
    }

    if phone
        .chars()
        .any(|c| !c.is_ascii_digit() && !PHONE_FORMATTING.contains(&c))
    {
        return Err(field_violation(
            "phone",
            "Phone number may only contain digits, spaces and + - . ( )",
        ));
    }

    match phone_digit_count(phone) {
        0 => Err(field_violation("phone", "Phone number is required")),
        n if n < MIN_PHONE_DIGITS => Err(field_violation(
            "phone",
            format!("Phone number must contain at least {MIN_PHONE_DIGITS} digits"),
        )),
        n if n > MAX_PHONE_DIGITS => Err(field_violation(
            "phone",
            format!("Phone number must contain at most {MAX_PHONE_DIGITS} digits"),
        )),
        _ => Ok(()),
    }
}
