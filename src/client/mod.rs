//! Client side: form submission and the HTTP-backed store

pub mod controller;
pub mod http_store;

pub use controller::{
    Notification, NotificationKind, Screen, SubmissionController, SubmissionOutcome,
    SubmissionState,
};
pub use http_store::HttpStore;
