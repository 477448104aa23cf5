//! User domain
//!
//! Account types for signup and signin.

mod entity;

pub use entity::{StoredUser, UserAccount, UserEmail};
