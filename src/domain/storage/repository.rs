//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::StorageError;

use super::entity::StorageEntity;

/// Append-only document storage keyed by each entity's key
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    /// Retrieves a document by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, StorageError>;

    /// Retrieves all documents, in the backend's natural scan order
    async fn list(&self) -> Result<Vec<E>, StorageError>;

    /// Inserts a new document, fails with `DuplicateKey` if the key is taken
    async fn create(&self, entity: E) -> Result<E, StorageError>;

    /// Checks if a document exists by its key
    async fn exists(&self, key: &E::Key) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the count of documents
    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.list().await?.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::storage::StorageKey;

    /// Vec-backed storage for tests. A configured error fails every call.
    #[derive(Debug)]
    pub struct MockStorage<E>
    where
        E: StorageEntity,
    {
        documents: Mutex<Vec<E>>,
        error: Option<StorageError>,
    }

    impl<E> Default for MockStorage<E>
    where
        E: StorageEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockStorage<E>
    where
        E: StorageEntity,
    {
        pub fn new() -> Self {
            Self {
                documents: Mutex::new(Vec::new()),
                error: None,
            }
        }

        pub fn with_entity(self, entity: E) -> Self {
            self.documents.lock().unwrap().push(entity);
            self
        }

        pub fn with_error(mut self, error: StorageError) -> Self {
            self.error = Some(error);
            self
        }

        fn fail(&self) -> Result<(), StorageError> {
            self.error.clone().map_or(Ok(()), Err)
        }
    }

    #[async_trait]
    impl<E> Storage<E> for MockStorage<E>
    where
        E: StorageEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, StorageError> {
            self.fail()?;
            let documents = self.documents.lock().unwrap();
            Ok(documents.iter().find(|d| d.key() == key).cloned())
        }

        async fn list(&self) -> Result<Vec<E>, StorageError> {
            self.fail()?;
            Ok(self.documents.lock().unwrap().clone())
        }

        async fn create(&self, entity: E) -> Result<E, StorageError> {
            self.fail()?;
            let mut documents = self.documents.lock().unwrap();

            if documents.iter().any(|d| d.key() == entity.key()) {
                return Err(StorageError::duplicate_key(format!(
                    "Document with key '{}' already exists",
                    entity.key().as_str()
                )));
            }

            documents.push(entity.clone());
            Ok(entity)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::user::{StoredUser, UserEmail};

        fn user(email: &str) -> StoredUser {
            StoredUser::new(UserEmail::new(email), "hash")
        }

        #[tokio::test]
        async fn test_seeded_entity_blocks_duplicate() {
            let storage = MockStorage::new().with_entity(user("a@x.com"));

            let result = storage.create(user("a@x.com")).await;
            assert!(result.unwrap_err().is_duplicate_key());
        }

        #[tokio::test]
        async fn test_default_exists_and_count() {
            let storage = MockStorage::new()
                .with_entity(user("a@x.com"))
                .with_entity(user("b@x.com"));

            assert!(storage.exists(&UserEmail::new("a@x.com")).await.unwrap());
            assert!(!storage.exists(&UserEmail::new("c@x.com")).await.unwrap());
            assert_eq!(storage.count().await.unwrap(), 2);
        }

        #[tokio::test]
        async fn test_configured_error_fails_every_call() {
            let storage: MockStorage<StoredUser> =
                MockStorage::new().with_error(StorageError::connection("unreachable"));

            assert_eq!(
                storage.list().await.unwrap_err(),
                StorageError::connection("unreachable")
            );
            assert!(storage.create(user("a@x.com")).await.is_err());
        }
    }
}
