// HTTP request handlers
use crate::application::dashboard_source::EmployeeDirectory;
use crate::domain::errors::DashboardError;
use crate::presentation::app_state::AppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Cache-busting token, only there to make every URL unique
    #[serde(rename = "_ts")]
    pub cache_token: Option<String>,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/employees", get(find_employee))
        .route("/api/employees/:id/dashboard", get(employee_dashboard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Aggregated dashboard of one employee; never cacheable
pub async fn employee_dashboard(
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    tracing::debug!(
        "Dashboard request for {} (token {})",
        id,
        query.cache_token.as_deref().unwrap_or("-")
    );

    let result = state
        .aggregation_service
        .build_dashboard(&id, query.from_date, query.to_date)
        .await;

    let no_store = [(header::CACHE_CONTROL, "no-store")];
    match result {
        Ok(payload) => (no_store, Json(payload)).into_response(),
        Err(DashboardError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            no_store,
            Json(json!({ "error": message })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error building dashboard for {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                no_store,
                Json(json!({ "error": "Failed to build dashboard" })),
            )
                .into_response()
        }
    }
}

/// Employee linked to a user account
pub async fn find_employee(
    Query(query): Query<UserQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.aggregation_service.employee_for_user(&query.user_id).await {
        Ok(employee) => Json(json!({ "employee": employee })).into_response(),
        Err(e) => {
            tracing::error!("Error looking up employee for {}: {:#}", query.user_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
