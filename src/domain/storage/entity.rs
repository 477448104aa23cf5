use std::fmt::Debug;
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

/// Document key. Backends index and persist it through `as_str`.
pub trait StorageKey: Clone + Debug + Eq + Hash + Send + Sync {
    fn as_str(&self) -> &str;
}

/// A serializable document with a unique key
pub trait StorageEntity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync {
    type Key: StorageKey;

    fn key(&self) -> &Self::Key;
}
