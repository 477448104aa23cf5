//! Employee entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_idempotency_key, IdentifierError};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::validation::NormalizedFields;

/// Client-supplied token making employee creation replay-safe
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Create a new IdempotencyKey after validation
    pub fn new(key: impl Into<String>) -> Result<Self, IdentifierError> {
        let key = key.into();
        validate_idempotency_key(&key)?;
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IdempotencyKey {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdempotencyKey> for String {
    fn from(key: IdempotencyKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document key of a stored employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// A fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier owned by an idempotency key; replays map to the same id
    pub fn for_idempotency_key(key: &IdempotencyKey) -> Self {
        Self(format!("idem:{}", key.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageKey for EmployeeId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Employee details as submitted by the employee form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    name: String,
    email: String,
    position: String,
    phone: String,
    /// Expected `YYYY-MM-DD`, kept as text
    hire_date: String,
}

impl EmployeeRecord {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
        phone: impl Into<String>,
        hire_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            position: position.into(),
            phone: phone.into(),
            hire_date: hire_date.into(),
        }
    }

    /// Build a record from fields validated against the employee rule set
    pub fn from_fields(fields: &NormalizedFields) -> Self {
        Self::new(
            fields.get("name"),
            fields.get("email"),
            fields.get("position"),
            fields.get("phone"),
            fields.get("hireDate"),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn hire_date(&self) -> &str {
        &self.hire_date
    }
}

/// Persisted employee document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEmployee {
    id: EmployeeId,
    #[serde(flatten)]
    record: EmployeeRecord,
    created_at: DateTime<Utc>,
}

impl StoredEmployee {
    pub fn new(id: EmployeeId, record: EmployeeRecord) -> Self {
        Self {
            id,
            record,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &EmployeeId {
        &self.id
    }

    pub fn record(&self) -> &EmployeeRecord {
        &self.record
    }

    pub fn into_record(self) -> EmployeeRecord {
        self.record
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl StorageEntity for StoredEmployee {
    type Key = EmployeeId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
