//! Store implementation speaking to the registration REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use crate::api::employees::IDEMPOTENCY_KEY_HEADER;
use crate::api::types::ApiErrorResponse;
use crate::config::ClientConfig;
use crate::domain::{EmployeeRecord, IdempotencyKey, StorageError, Store, UserAccount, UserEmail};

/// HTTP-backed store. Every call is bounded by the client timeout.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, StorageError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, StorageError> {
        request
            .send()
            .await
            .map_err(|e| transport_error(e, "Request failed"))
    }

    /// Rebuild the storage error carried by a non-success response
    async fn error_from_response(response: Response) -> StorageError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return transport_error(e, "Failed to read error response"),
        };

        match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(body) => {
                let message = body.details.unwrap_or(body.error);
                match body.code.as_deref() {
                    None if status == StatusCode::SERVICE_UNAVAILABLE => {
                        StorageError::connection(message)
                    }
                    code => StorageError::from_code(code, message),
                }
            }
            Err(_) if status == StatusCode::SERVICE_UNAVAILABLE => {
                StorageError::connection(format!("HTTP {}", status))
            }
            Err(_) => StorageError::unknown(format!("HTTP {}: {}", status, text)),
        }
    }
}

/// Timeouts and broken connections, including while reading a body, are
/// connection errors. Anything else (a malformed body) is unknown.
fn transport_error(error: reqwest::Error, context: &str) -> StorageError {
    warn!(error = %error, "{}", context);

    if error.is_timeout() {
        StorageError::connection(format!("Request timed out: {}", error))
    } else if error.is_connect() || error.is_request() || error.is_body() {
        StorageError::connection(format!("{}: {}", context, error))
    } else {
        StorageError::unknown(format!("{}: {}", context, error))
    }
}

#[async_trait]
impl Store for HttpStore {
    async fn create_user(&self, email: &str, password: &str) -> Result<(), StorageError> {
        debug!(email = %email, "POST /api/users/signup");

        let response = self
            .send(
                self.client
                    .post(self.url("/api/users/signup"))
                    .json(&json!({"email": email, "password": password})),
            )
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn find_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, StorageError> {
        debug!(email = %email, "POST /api/users/signin");

        let response = self
            .send(
                self.client
                    .post(self.url("/api/users/signin"))
                    .json(&json!({"email": email, "password": password})),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(UserAccount::new(UserEmail::new(email)))),
            StatusCode::UNAUTHORIZED => Ok(None),
            _ => Err(Self::error_from_response(response).await),
        }
    }

    async fn create_employee(
        &self,
        record: EmployeeRecord,
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<(), StorageError> {
        debug!(name = %record.name(), "POST /api/employees/add");

        let mut request = self.client.post(self.url("/api/employees/add")).json(&record);
        if let Some(key) = &idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key.as_str());
        }

        let response = self.send(request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, StorageError> {
        let response = self.send(self.client.get(self.url("/api/employees"))).await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<Vec<EmployeeRecord>>()
            .await
            .map_err(|e| transport_error(e, "Invalid employee list"))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let response = self.send(self.client.get(self.url("/ready"))).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StorageError::connection(format!(
                "Registry not ready: HTTP {}",
                response.status()
            )))
        }
    }
}
