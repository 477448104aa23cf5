//! Infrastructure layer - Storage backends, hashing and logging

pub mod logging;
pub mod storage;
pub mod store;
pub mod user;
