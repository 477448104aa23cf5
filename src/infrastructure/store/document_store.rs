//! Server-side store over document storage

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::employee::{EmployeeId, EmployeeRecord, IdempotencyKey, StoredEmployee};
use crate::domain::storage::Storage;
use crate::domain::store::Store;
use crate::domain::user::{StoredUser, UserAccount, UserEmail};
use crate::domain::StorageError;
use crate::infrastructure::storage::{InMemoryStorage, StorageConfig};
use crate::infrastructure::user::{Argon2Hasher, PasswordHasher};

pub const USERS_TABLE: &str = "users";
pub const EMPLOYEES_TABLE: &str = "employees";

/// Store backed by a `users` and an `employees` document collection
#[derive(Debug, Clone)]
pub struct DocumentStore {
    users: Arc<dyn Storage<StoredUser>>,
    employees: Arc<dyn Storage<StoredEmployee>>,
    hasher: Arc<dyn PasswordHasher>,
}

impl DocumentStore {
    pub fn new(
        users: Arc<dyn Storage<StoredUser>>,
        employees: Arc<dyn Storage<StoredEmployee>>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            employees,
            hasher,
        }
    }

    /// A store over fresh in-memory collections
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStorage::<StoredUser>::new()),
            Arc::new(InMemoryStorage::<StoredEmployee>::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    /// Initialize the configured backend and return a ready store
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let backend = config.open().await?;
        let users = backend.collection(USERS_TABLE).await?;
        let employees = backend.collection(EMPLOYEES_TABLE).await?;
        info!(backend = %config.storage_type(), "Document store ready");

        Ok(Self::new(users, employees, Arc::new(Argon2Hasher::new())))
    }

    /// Argon2 is memory-hard, so it runs on the blocking pool
    async fn run_hasher<T, F>(&self, task: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PasswordHasher) -> T + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || task(hasher.as_ref()))
            .await
            .map_err(|e| StorageError::unknown(format!("Password task failed: {}", e)))
    }
}

#[async_trait]
impl Store for DocumentStore {
    async fn create_user(&self, email: &str, password: &str) -> Result<(), StorageError> {
        let password = password.to_string();
        let password_hash = self
            .run_hasher(move |hasher| hasher.hash(&password))
            .await??;
        let user = StoredUser::new(UserEmail::new(email), password_hash);

        self.users.create(user).await.map_err(|e| {
            if e.is_duplicate_key() {
                StorageError::duplicate_key(format!("User '{}' already exists", email))
            } else {
                e
            }
        })?;

        debug!(email = %email, "User created");
        Ok(())
    }

    async fn find_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, StorageError> {
        let Some(user) = self.users.get(&UserEmail::new(email)).await? else {
            debug!(email = %email, "No account for email");
            return Ok(None);
        };

        let password = password.to_string();
        let hash = user.password_hash().to_string();
        if !self
            .run_hasher(move |hasher| hasher.verify(&password, &hash))
            .await?
        {
            debug!(email = %email, "Password mismatch");
            return Ok(None);
        }

        Ok(Some(user.account()))
    }

    async fn create_employee(
        &self,
        record: EmployeeRecord,
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<(), StorageError> {
        let id = match &idempotency_key {
            Some(key) => EmployeeId::for_idempotency_key(key),
            None => EmployeeId::generate(),
        };

        match self.employees.create(StoredEmployee::new(id.clone(), record)).await {
            Ok(_) => {
                debug!(id = %id, "Employee created");
                Ok(())
            }
            Err(e) if e.is_duplicate_key() && idempotency_key.is_some() => {
                info!(id = %id, "Replayed employee submission acknowledged");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, StorageError> {
        let employees = self.employees.list().await?;
        Ok(employees.into_iter().map(StoredEmployee::into_record).collect())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.employees.count().await.map(|_| ())
    }
}
