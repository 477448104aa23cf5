//! Persistence boundary for accounts and employees

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::employee::{EmployeeRecord, IdempotencyKey};
use crate::domain::user::UserAccount;
use crate::domain::StorageError;

/// The four persistence operations behind signup, signin and the employee form
#[async_trait]
pub trait Store: Send + Sync + Debug {
    /// Register an account; fails with `DuplicateKey` if the email is taken
    async fn create_user(&self, email: &str, password: &str) -> Result<(), StorageError>;

    /// The account matching both email and password, if any
    async fn find_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, StorageError>;

    /// Append an employee record.
    ///
    /// Without a key every call inserts a new record. With a key, a replay of
    /// the same key is acknowledged without inserting again.
    async fn create_employee(
        &self,
        record: EmployeeRecord,
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<(), StorageError>;

    /// All employee records, order unspecified
    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, StorageError>;

    /// Readiness probe
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{Mutex, RwLock};

    use crate::domain::user::UserEmail;

    /// A call received by the mock store
    #[derive(Debug, Clone, PartialEq)]
    pub enum StoreCall {
        CreateUser { email: String, password: String },
        FindUser { email: String, password: String },
        CreateEmployee {
            record: EmployeeRecord,
            idempotency_key: Option<IdempotencyKey>,
        },
        ListEmployees,
    }

    /// Mock store recording every call, with optional failure and latency
    #[derive(Debug, Default)]
    pub struct MockStore {
        calls: Arc<Mutex<Vec<StoreCall>>>,
        users: Arc<RwLock<Vec<(String, String)>>>,
        employees: Arc<RwLock<Vec<EmployeeRecord>>>,
        error: Arc<RwLock<Option<StorageError>>>,
        delay: Option<Duration>,
    }

    impl MockStore {
        /// Create a new mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Delay every operation, to hold a submission in flight
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Make every operation fail with `error`
        pub async fn set_error(&self, error: Option<StorageError>) {
            *self.error.write().await = error;
        }

        pub async fn calls(&self) -> Vec<StoreCall> {
            self.calls.lock().await.clone()
        }

        async fn record(&self, call: StoreCall) -> Result<(), StorageError> {
            self.calls.lock().await.push(call);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match self.error.read().await.clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Store for MockStore {
        async fn create_user(&self, email: &str, password: &str) -> Result<(), StorageError> {
            self.record(StoreCall::CreateUser {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

            let mut users = self.users.write().await;

            if users.iter().any(|(e, _)| e == email) {
                return Err(StorageError::duplicate_key(format!(
                    "User '{}' already exists",
                    email
                )));
            }

            users.push((email.to_string(), password.to_string()));
            Ok(())
        }

        async fn find_user(
            &self,
            email: &str,
            password: &str,
        ) -> Result<Option<UserAccount>, StorageError> {
            self.record(StoreCall::FindUser {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

            let users = self.users.read().await;
            Ok(users
                .iter()
                .find(|(e, p)| e == email && p == password)
                .map(|(e, _)| UserAccount::new(UserEmail::new(e.clone()))))
        }

        async fn create_employee(
            &self,
            record: EmployeeRecord,
            idempotency_key: Option<IdempotencyKey>,
        ) -> Result<(), StorageError> {
            self.record(StoreCall::CreateEmployee {
                record: record.clone(),
                idempotency_key,
            })
            .await?;

            self.employees.write().await.push(record);
            Ok(())
        }

        async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, StorageError> {
            self.record(StoreCall::ListEmployees).await?;
            Ok(self.employees.read().await.clone())
        }

        /// Fails with the configured error; not recorded as a call
        async fn ping(&self) -> Result<(), StorageError> {
            match self.error.read().await.clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_records_calls() {
            let store = MockStore::new();

            store.create_user("a@x.com", "p").await.unwrap();
            store.find_user("a@x.com", "p").await.unwrap();

            assert_eq!(
                store.calls().await,
                vec![
                    StoreCall::CreateUser {
                        email: "a@x.com".to_string(),
                        password: "p".to_string(),
                    },
                    StoreCall::FindUser {
                        email: "a@x.com".to_string(),
                        password: "p".to_string(),
                    },
                ]
            );
        }

        #[tokio::test]
        async fn test_mock_configured_error() {
            let store = MockStore::new();
            store.set_error(Some(StorageError::connection("down"))).await;

            let result = store.list_employees().await;
            assert_eq!(result.unwrap_err(), StorageError::connection("down"));
        }
    }
}
