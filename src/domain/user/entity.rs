//! User account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::storage::{StorageEntity, StorageKey};

/// Account email; the identity and document key of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageKey for UserEmail {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account as seen outside the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    email: UserEmail,
}

impl UserAccount {
    pub fn new(email: UserEmail) -> Self {
        Self { email }
    }

    pub fn email(&self) -> &UserEmail {
        &self.email
    }
}

/// Persisted user document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    email: UserEmail,
    /// Argon2 PHC string
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(email: UserEmail, password_hash: impl Into<String>) -> Self {
        Self {
            email,
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }

    pub fn email(&self) -> &UserEmail {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn account(&self) -> UserAccount {
        UserAccount::new(self.email.clone())
    }
}

impl StorageEntity for StoredUser {
    type Key = UserEmail;

    fn key(&self) -> &Self::Key {
        &self.email
    }
}
