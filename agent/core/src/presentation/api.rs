// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP query interface over the configuration store and advisor.
//!
//! | Route | Success | Failure |
//! |-------|---------|---------|
//! | `GET /api/config` | 200 snapshot | 503 before load |
//! | `PUT /api/config` | 200 snapshot | 422 violations, 409 fallback, 503 persistence |
//! | `POST /api/config/services` | 201 entry | 422 violations, 409 fallback |
//! | `DELETE /api/config/services/{id}` | 200 snapshot | 409 fallback, 503 persistence |
//! | `GET /api/config/summary` | 200 summary | 503 before load |
//! | `POST /api/advisor` | 200 `{text}` | 503 no key / disabled, 502 provider |
//!
//! When the persisted document could not be used at load, reads serve the
//! defaults but every write answers 409 until the document is repaired and
//! reloaded. The CLI service commands refuse the same way.

use crate::application::advisor::AdvisorService;
use crate::application::config_store::{ConfigStore, ConfigStoreError, Durability};
use crate::application::summary::ConfigSummary;
use crate::domain::advisor::AdvisorError;
use crate::domain::config::{AgentConfiguration, ServiceId, ServiceType};
use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Port of the browser dashboard during development
const DASHBOARD_DEV_PORT: u16 = 3000;

pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub advisor: Arc<AdvisorService>,
}

pub fn app(store: Arc<ConfigStore>, advisor: Arc<AdvisorService>, api_port: u16) -> Router {
    let state = Arc::new(AppState { store, advisor });

    Router::new()
        .route("/api/config", get(get_config).put(put_config))
        .route("/api/config/summary", get(get_summary))
        .route("/api/config/services", post(add_service))
        .route("/api/config/services/{id}", delete(remove_service))
        .route("/api/advisor", post(ask_advisor))
        .layer(localhost_cors(api_port))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn localhost_cors(api_port: u16) -> CorsLayer {
    let origins: Vec<HeaderValue> = [api_port, DASHBOARD_DEV_PORT]
        .iter()
        .flat_map(|port| {
            [
                format!("http://127.0.0.1:{}", port),
                format!("http://localhost:{}", port),
            ]
        })
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(tower_http::cors::Any)
}

/// Bind and serve until Ctrl-C
pub async fn serve(router: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP interface listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

pub enum ApiError {
    Store(ConfigStoreError),
    Advisor(AdvisorError),
}

impl From<ConfigStoreError> for ApiError {
    fn from(e: ConfigStoreError) -> Self {
        Self::Store(e)
    }
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        Self::Advisor(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store(ConfigStoreError::Validation(violations)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "violations": violations })),
            )
                .into_response(),
            ApiError::Store(ConfigStoreError::Unavailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "unavailable" })),
            )
                .into_response(),
            ApiError::Store(e @ ConfigStoreError::Persistence(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string(), "durability": Durability::Unconfirmed })),
            )
                .into_response(),
            ApiError::Store(e @ ConfigStoreError::FellBack(_)) => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "fallback", "message": e.to_string() })),
            )
                .into_response(),
            ApiError::Store(e @ ConfigStoreError::Unreadable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
            ApiError::Store(e @ ConfigStoreError::Encoding(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
            ApiError::Advisor(e @ (AdvisorError::MissingApiKey | AdvisorError::Disabled)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
            ApiError::Advisor(e @ AdvisorError::Generation(_)) => {
                warn!("Advisor request failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

/// Writes against a store that never loaded would clobber an unread document
fn require_loaded(store: &ConfigStore) -> Result<(), ApiError> {
    if store.is_loaded() {
        Ok(())
    } else {
        Err(ConfigStoreError::Unavailable.into())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_config(State(state): State<Arc<AppState>>) -> Result<Json<AgentConfiguration>, ApiError> {
    let snapshot = state.store.snapshot()?;
    Ok(Json((*snapshot).clone()))
}

async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<AgentConfiguration>,
) -> Result<Json<AgentConfiguration>, ApiError> {
    require_loaded(&state.store)?;
    let snapshot = state.store.replace(candidate).await?;
    Ok(Json((*snapshot).clone()))
}

#[derive(Debug, Deserialize)]
pub struct AddServiceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub details: String,
}

async fn add_service(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddServiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_loaded(&state.store)?;
    let entry = state
        .store
        .add_service(request.name, request.service_type, request.details)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn remove_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AgentConfiguration>, ApiError> {
    require_loaded(&state.store)?;
    let snapshot = state.store.remove_service(&ServiceId(id)).await?;
    Ok(Json((*snapshot).clone()))
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: ConfigSummary,
    pub durability: Durability,
}

async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<SummaryResponse>, ApiError> {
    let snapshot = state.store.snapshot()?;
    let summary = ConfigSummary::from_config(&snapshot).map_err(ConfigStoreError::from)?;
    Ok(Json(SummaryResponse {
        summary,
        durability: state.store.durability(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub prompt: String,
}

async fn ask_advisor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdviceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.snapshot()?;
    let text = state.advisor.ask(&request.prompt).await?;
    Ok(Json(json!({ "text": text })))
}
