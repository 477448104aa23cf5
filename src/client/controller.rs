//! Per-form submission orchestration
//!
//! A [`SubmissionController`] owns one form. It validates the raw input,
//! calls the matching [`Store`] operation and turns the result into a
//! notification plus a navigation target. At most one submission is in
//! flight per controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::domain::{
    validate, EmployeeRecord, FieldErrors, FormKind, IdempotencyKey, NormalizedFields, RawFields,
    StorageError, Store,
};

/// Screens a successful submission can lead to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    SignUp,
    Employee,
}

impl Screen {
    /// The form displayed on this screen
    pub fn form(&self) -> FormKind {
        match self {
            Self::SignIn => FormKind::SignIn,
            Self::SignUp => FormKind::SignUp,
            Self::Employee => FormKind::Employee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast-style message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// How a call to [`SubmissionController::submit`] resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded {
        notification: Notification,
        navigate_to: Screen,
    },
    /// Validation failed; the store was not called
    Invalid(FieldErrors),
    Failed {
        notification: Notification,
    },
    /// Another submission is still in flight; the store was not called
    Busy,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Succeeded { notification, .. } | Self::Failed { notification } => {
                Some(notification)
            }
            Self::Invalid(_) | Self::Busy => None,
        }
    }
}

#[derive(Debug)]
pub struct SubmissionController {
    kind: FormKind,
    store: Arc<dyn Store>,
    state: Mutex<SubmissionState>,
    idempotency_key: Option<IdempotencyKey>,
}

impl SubmissionController {
    pub fn new(kind: FormKind, store: Arc<dyn Store>) -> Self {
        Self {
            kind,
            store,
            state: Mutex::new(SubmissionState::Idle),
            idempotency_key: None,
        }
    }

    /// Attach a key to employee submissions so a resubmit is not inserted twice
    pub fn with_idempotency_key(mut self, key: IdempotencyKey) -> Self {
        self.idempotency_key = Some(key);
        self
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn state(&self) -> SubmissionState {
        *self.lock_state()
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }


    /// Validate `raw` and, if valid, persist it through the store
    pub async fn submit(&self, raw: &RawFields) -> SubmissionOutcome {
        let fields = {
            let mut state = self.lock_state();

            if *state == SubmissionState::Submitting {
                debug!(form = %self.kind, "Submission already in flight");
                return SubmissionOutcome::Busy;
            }

            *state = SubmissionState::Validating;

            match validate(self.kind, raw) {
                Ok(fields) => {
                    *state = SubmissionState::Submitting;
                    fields
                }
                Err(errors) => {
                    *state = SubmissionState::Failed;
                    debug!(form = %self.kind, errors = %errors, "Validation failed");
                    return SubmissionOutcome::Invalid(errors);
                }
            }
        };

        let in_flight = InFlight::new(self.kind, &self.state);
        let outcome = self.dispatch(&fields).await;

        in_flight.finish(if outcome.is_success() {
            SubmissionState::Succeeded
        } else {
            SubmissionState::Failed
        });

        outcome
    }

    async fn dispatch(&self, fields: &NormalizedFields) -> SubmissionOutcome {
        match self.kind {
            FormKind::SignUp => {
                match self
                    .store
                    .create_user(fields.get("email"), fields.get("password"))
                    .await
                {
                    Ok(()) => succeeded("Account created successfully", Screen::SignIn),
                    Err(e) => failed("Signup failed", &e),
                }
            }
            FormKind::SignIn => {
                match self
                    .store
                    .find_user(fields.get("email"), fields.get("password"))
                    .await
                {
                    Ok(Some(account)) => {
                        info!(email = %account.email(), "Signed in");
                        succeeded("Signed in successfully", Screen::Employee)
                    }
                    Ok(None) => SubmissionOutcome::Failed {
                        notification: Notification::error("Invalid credentials"),
                    },
                    Err(e) => failed("Sign in failed", &e),
                }
            }
            FormKind::Employee => {
                let record = EmployeeRecord::from_fields(fields);

                match self
                    .store
                    .create_employee(record, self.idempotency_key.clone())
                    .await
                {
                    Ok(()) => succeeded("Employee added successfully", Screen::SignIn),
                    Err(e) => failed("Failed to add employee", &e),
                }
            }
        }
    }
}

/// Moves a submission out of `Submitting` even when its future is dropped
/// before the store answers
struct InFlight<'a> {
    kind: FormKind,
    state: &'a Mutex<SubmissionState>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(kind: FormKind, state: &'a Mutex<SubmissionState>) -> Self {
        Self {
            kind,
            state,
            finished: false,
        }
    }

    fn finish(mut self, outcome: SubmissionState) {
        self.set(outcome);
        self.finished = true;
    }

    fn set(&self, state: SubmissionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!(form = %self.kind, "Submission cancelled before the store answered");
            self.set(SubmissionState::Failed);
        }
    }
}

fn succeeded(message: &str, navigate_to: Screen) -> SubmissionOutcome {
    SubmissionOutcome::Succeeded {
        notification: Notification::success(message),
        navigate_to,
    }
}

fn failed(prefix: &str, error: &StorageError) -> SubmissionOutcome {
    warn!(error = %error, "{}", prefix);

    SubmissionOutcome::Failed {
        notification: Notification::error(failure_message(prefix, error.message())),
    }
}

/// `"<prefix>: <message>"`, or a generic retry hint when the message is empty
pub fn failure_message(prefix: &str, message: &str) -> String {
    if message.trim().is_empty() {
        format!("{}. Please try again.", prefix)
    } else {
        format!("{}: {}", prefix, message)
    }
}
