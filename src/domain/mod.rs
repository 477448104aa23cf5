//! Domain layer - Core entities, validation and the persistence boundary

pub mod employee;
pub mod error;
pub mod storage;
pub mod store;
pub mod user;
pub mod validation;

pub use employee::{EmployeeId, EmployeeRecord, IdempotencyKey, StoredEmployee};
pub use error::StorageError;
pub use storage::{Storage, StorageEntity, StorageKey};
pub use store::Store;
pub use user::{StoredUser, UserAccount, UserEmail};
pub use validation::{validate, FieldErrors, FormKind, NormalizedFields, RawFields};
