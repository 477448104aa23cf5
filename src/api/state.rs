//! Application state shared by the handlers

use std::sync::Arc;

use crate::domain::Store;

/// Application state containing the store behind every endpoint
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
