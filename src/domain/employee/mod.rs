//! Employee domain
//!
//! Employee records, their stored documents, and the idempotency key that
//! makes creation replay-safe.

mod entity;
mod validation;

pub use entity::{EmployeeId, EmployeeRecord, IdempotencyKey, StoredEmployee};
pub use validation::{validate_idempotency_key, IdentifierError, MAX_IDEMPOTENCY_KEY_LENGTH};
