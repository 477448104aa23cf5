//! Process-local document storage

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::StorageError;

/// Documents in insertion order with a key index
#[derive(Debug)]
struct Documents<E> {
    rows: Vec<E>,
    index: HashMap<String, usize>,
}

/// In-memory storage; contents live as long as the process.
///
/// `list` returns documents in insertion order.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    documents: RwLock<Documents<E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Documents {
                rows: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents<E>>, StorageError> {
        self.documents
            .read()
            .map_err(|e| StorageError::unknown(format!("Storage lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Documents<E>>, StorageError> {
        self.documents
            .write()
            .map_err(|e| StorageError::unknown(format!("Storage lock poisoned: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, StorageError> {
        let documents = self.read()?;

        Ok(documents
            .index
            .get(key.as_str())
            .map(|&position| documents.rows[position].clone()))
    }

    async fn list(&self) -> Result<Vec<E>, StorageError> {
        Ok(self.read()?.rows.clone())
    }

    async fn create(&self, entity: E) -> Result<E, StorageError> {
        let key = entity.key().as_str().to_string();
        let mut documents = self.write()?;

        if documents.index.contains_key(&key) {
            return Err(StorageError::duplicate_key(format!(
                "Document with key '{}' already exists",
                key
            )));
        }

        let position = documents.rows.len();
        documents.rows.push(entity.clone());
        documents.index.insert(key, position);

        Ok(entity)
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, StorageError> {
        Ok(self.read()?.index.contains_key(key.as_str()))
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.rows.len())
    }
}
