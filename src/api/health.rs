//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Unhealthy,
}

impl ProbeStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProbe {
    pub status: ProbeStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreProbe>,
}

pub async fn health_check() -> Json<ProbeReport> {
    Json(ProbeReport {
        status: ProbeStatus::Healthy,
        version: VERSION,
        store: None,
    })
}

/// 503 while the store does not answer a ping
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<ProbeReport>) {
    let started = Instant::now();
    let ping = state.store().ping().await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let store = match ping {
        Ok(()) => StoreProbe {
            status: ProbeStatus::Healthy,
            latency_ms,
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            StoreProbe {
                status: ProbeStatus::Unhealthy,
                latency_ms,
                error: Some(e.message().to_string()),
            }
        }
    };

    let status = store.status;
    let report = ProbeReport {
        status,
        version: VERSION,
        store: Some(store),
    };

    (status.status_code(), Json(report))
}

pub async fn live_check() -> StatusCode {
    StatusCode::OK
}
