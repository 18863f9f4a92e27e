// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of HydroWatch.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use hydrowatch_core::{ChartError, ChartService, InstallationDirectory, SampleSource};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, warn};

/// Application state for web handlers
pub struct AppState<D, S> {
    pub service: Arc<ChartService<D, S>>,
    /// Bounds the response, not the work: a read still running when it
    /// expires completes on the blocking pool and its result is dropped.
    pub source_timeout: Duration,
    /// Wall clock, replaceable for tests
    pub clock: fn() -> DateTime<Utc>,
}

impl<D, S> AppState<D, S> {
    pub fn new(service: ChartService<D, S>, source_timeout: Duration) -> Self {
        Self {
            service: Arc::new(service),
            source_timeout,
            clock: Utc::now,
        }
    }
}

impl<D, S> Clone for AppState<D, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            source_timeout: self.source_timeout,
            clock: self.clock,
        }
    }
}

impl<D, S> std::fmt::Debug for AppState<D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("source_timeout", &self.source_timeout)
            .finish_non_exhaustive()
    }
}

/// Build the HTTP router
pub fn router<D, S>(state: AppState<D, S>) -> Router
where
    D: InstallationDirectory + 'static,
    S: SampleSource + 'static,
{
    Router::new()
        .route("/api/chart-data/{nickname}", get(chart_data_handler::<D, S>))
        .route("/api/installations", get(installations_handler::<D, S>))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error body: `{"error": <kind>, "message": <text>}`
#[derive(Debug)]
pub struct ApiError(pub ChartError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ChartError::UnknownInstallation { .. } => StatusCode::NOT_FOUND,
            ChartError::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ChartError::MalformedSource { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Chart data endpoint: full-year timeline plus today/month/year power maxima
async fn chart_data_handler<D, S>(
    State(state): State<AppState<D, S>>,
    Path(nickname): Path<String>,
) -> Result<Response, ApiError>
where
    D: InstallationDirectory + 'static,
    S: SampleSource + 'static,
{
    debug!(installation = %nickname, "Chart data requested");

    let now = (state.clock)()
        .with_timezone(&state.service.timezone())
        .naive_local();

    let service = Arc::clone(&state.service);
    let id = nickname.clone();
    let task = tokio::task::spawn_blocking(move || service.chart_data(&id, now));

    let result = match tokio::time::timeout(state.source_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => {
            error!(installation = %nickname, error = %join_err, "Chart task failed");
            return Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
        Err(_) => Err(ChartError::source_unavailable(
            &nickname,
            format!(
                "timed out after {}s",
                state.source_timeout.as_secs_f64()
            ),
        )),
    };

    match result {
        Ok(data) => Ok(Json(data).into_response()),
        Err(e) => {
            if matches!(e, ChartError::UnknownInstallation { .. }) {
                warn!(
                    installation = %e.installation(),
                    "Chart data requested for unknown installation"
                );
            } else {
                error!(
                    installation = %e.installation(),
                    kind = e.kind(),
                    error = %e,
                    "Failed to build chart data"
                );
            }
            Err(ApiError(e))
        }
    }
}

/// Known installations: nickname, display name, flow unit
#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn installations_handler<D, S>(State(state): State<AppState<D, S>>) -> impl IntoResponse
where
    D: InstallationDirectory + 'static,
    S: SampleSource + 'static,
{
    Json(state.service.directory().list())
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                ChartError::unknown_installation("x"),
                StatusCode::NOT_FOUND,
            ),
            (
                ChartError::source_unavailable("x", "down"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ChartError::malformed("x", Some(1), "bad"),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
