//! Short code generation and validation utilities.
//!
//! Codes are drawn from the 62-symbol alphabet `A-Z`, `a-z`, `0-9`. With the
//! default length of 6 the code space is 62^6 (about 5.68e10), so collisions
//! are rare but possible and must be handled by the caller.

use crate::error::AppError;
use rand::{Rng, distr::Alphanumeric};
use serde_json::json;

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Upper bound for caller-supplied codes.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 32;

/// Codes shadowed by top-level routes; a link with one of these would never
/// be reachable through `GET /{code}`.
const RESERVED_CODES: &[&str] = &["health", "api"];

/// Generates a random short code of exactly `length` characters.
///
/// Characters are sampled uniformly from `[A-Za-z0-9]` using the thread-local
/// CSPRNG, so codes cannot be predicted from previously issued ones.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates a caller-supplied short code.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters and digits
/// - Not a reserved route name (`health`, `api`)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            format!("Short code must be 1-{MAX_CUSTOM_CODE_LENGTH} characters"),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Short code can only contain letters and digits",
            json!({ "short_code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This short code is reserved",
            json!({ "short_code": code }),
        ));
    }

    Ok(())
}
