//! Employee identifier validation

use thiserror::Error;

/// Errors that can occur when parsing an idempotency key
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentifierError {
    #[error("Idempotency key cannot be empty")]
    EmptyKey,

    #[error("Idempotency key exceeds maximum length of {0} characters")]
    KeyTooLong(usize),

    #[error("Idempotency key contains invalid character: '{0}'. Only visible ASCII characters are allowed")]
    InvalidKeyCharacter(char),
}

/// Leaves room for the document key prefix within a 255 character column
pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 200;

/// Validate an idempotency key
///
/// Rules:
/// - Cannot be empty
/// - Maximum 200 characters
/// - Visible ASCII only (no whitespace or control characters)
pub fn validate_idempotency_key(key: &str) -> Result<(), IdentifierError> {
    if key.is_empty() {
        return Err(IdentifierError::EmptyKey);
    }

    if key.len() > MAX_IDEMPOTENCY_KEY_LENGTH {
        return Err(IdentifierError::KeyTooLong(MAX_IDEMPOTENCY_KEY_LENGTH));
    }

    if let Some(c) = key.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(IdentifierError::InvalidKeyCharacter(c));
    }

    Ok(())
}
