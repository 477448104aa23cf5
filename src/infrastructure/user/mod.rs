//! User infrastructure module
//!
//! Password hashing for stored accounts.

mod password;

pub use password::{Argon2Hasher, PasswordHasher};
