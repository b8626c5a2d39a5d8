use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Country, ListQuery, RefreshOutcome, StatusReport};
use crate::refresh::RefreshService;
use crate::status::StatusReporter;
use crate::storage::CountryStorage;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "country-gdp-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /countries/refresh
///
/// Runs the full refresh pipeline: fetch both external sources, derive GDP
/// fields per country, commit the snapshot in one transaction, rebuild the
/// summary artifact.
///
/// # Returns
///
/// * `Result<Json<RefreshOutcome>, AppError>` - Pipeline result, or 503 on
///   source failure / 500 on persistence failure.
pub async fn refresh_countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshOutcome>, AppError> {
    tracing::info!("POST /countries/refresh");

    let service = RefreshService::new(&state.config, state.db.clone())?;
    let outcome = service.refresh().await?;

    tracing::info!(
        "Refresh complete: {} countries as of {}",
        outcome.total_countries,
        outcome.last_refreshed_at
    );

    Ok(Json(outcome))
}

/// GET /countries
///
/// Lists persisted records with optional `region`, `currency` and `sort`
/// query filters.
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ListQuery>,
) -> Result<Json<Vec<Country>>, AppError> {
    let storage = CountryStorage::new(state.db.clone());
    let countries = storage.list(&filter).await?;

    Ok(Json(countries))
}

/// GET /countries/:name
pub async fn get_country(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Country>, AppError> {
    let storage = CountryStorage::new(state.db.clone());
    let country = storage
        .find_by_name(&name)
        .await?
        .ok_or_else(|| AppError::NotFound("Country not found".to_string()))?;

    Ok(Json(country))
}

/// DELETE /countries/:name
///
/// # Returns
///
/// * `Result<StatusCode, AppError>` - 204 on delete, 404 if the name is unknown.
pub async fn delete_country(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let storage = CountryStorage::new(state.db.clone());
    let deleted = storage.delete_by_name(&name).await?;

    if !deleted {
        return Err(AppError::NotFound("Country not found".to_string()));
    }

    tracing::info!("Deleted country '{}'", name);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /countries/status
///
/// Read-only health view: record count, most recent refresh timestamp, and
/// the last rendered artifact (best-effort).
pub async fn country_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusReport>, AppError> {
    let reporter = StatusReporter::new(&state.config, state.db.clone());
    let report = reporter.status().await?;

    Ok(Json(report))
}

/// GET /countries/image
///
/// Serves the rendered summary PNG straight from disk; 404 when no refresh
/// has produced one yet.
pub async fn summary_image(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    match tokio::fs::read(&state.config.summary_image_path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes)),
        Err(_) => Err(AppError::NotFound("Summary image not found".to_string())),
    }
}
