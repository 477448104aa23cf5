//! Employee endpoints

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::api::users::MessageResponse;
use crate::domain::{validate, EmployeeRecord, FormKind, IdempotencyKey, RawFields};

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

pub fn create_employees_router() -> Router<AppState> {
    Router::new()
        .route("/api/employees/add", post(add_employee))
        .route("/api/employees", get(list_employees))
        .route("/api/employees/", get(list_employees))
}

fn idempotency_key(headers: &HeaderMap) -> Result<Option<IdempotencyKey>, ApiError> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };

    let invalid = |details: String| {
        ApiError::bad_request("Invalid Idempotency-Key header")
            .with_details(details)
            .with_code("validation")
    };

    let value = value.to_str().map_err(|e| invalid(e.to_string()))?;
    IdempotencyKey::new(value)
        .map(Some)
        .map_err(|e| invalid(e.to_string()))
}

/// POST /api/employees/add
pub async fn add_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = idempotency_key(&headers)?;
    let fields = validate(FormKind::Employee, &RawFields::from_json(&body))?;
    let record = EmployeeRecord::from_fields(&fields);

    debug!(name = %record.name(), idempotency_key = ?key.as_ref().map(IdempotencyKey::as_str), "Adding employee");

    state
        .store()
        .create_employee(record, key)
        .await
        .map_err(|e| ApiError::storage("Failed to add employee", e))?;

    Ok(Json(MessageResponse::new("Employee added successfully")))
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    let employees = state
        .store()
        .list_employees()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch employees", e))?;

    debug!(count = employees.len(), "Listed employees");
    Ok(Json(employees))
}
