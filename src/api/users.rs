//! Account endpoints: signup and signin

use axum::{extract::State, http::StatusCode, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{validate, FormKind, RawFields};

/// `{ message }` acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/api/users/signup", post(signup))
        .route("/api/users/signin", post(signin))
}

/// POST /api/users/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    let fields = validate(FormKind::SignIn, &RawFields::from_json(&body))?;
    debug!(email = %fields.get("email"), "Registering user");

    state
        .store()
        .create_user(fields.get("email"), fields.get("password"))
        .await
        .map_err(|e| ApiError::storage("Signup failed", e))?;

    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// POST /api/users/signin
pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SignInResponse>), ApiError> {
    let fields = validate(FormKind::SignIn, &RawFields::from_json(&body))?;
    debug!(email = %fields.get("email"), "Signing in");

    let account = state
        .store()
        .find_user(fields.get("email"), fields.get("password"))
        .await
        .map_err(|e| ApiError::storage("Signin failed", e))?;

    let response = match account {
        Some(_) => (
            StatusCode::OK,
            Json(SignInResponse {
                success: true,
                error: None,
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(SignInResponse {
                success: false,
                error: Some("Invalid credentials".to_string()),
            }),
        ),
    };

    Ok(response)
}
