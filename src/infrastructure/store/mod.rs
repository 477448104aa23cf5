//! Store implementations

mod document_store;

pub use document_store::{DocumentStore, EMPLOYEES_TABLE, USERS_TABLE};
