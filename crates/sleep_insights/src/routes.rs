//! HTTP surface for the insights service.

use std::sync::Arc;

use axum::debug_handler;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;

use crate::SleepInsightsService;
use crate::domains::DEFAULT_WINDOW_DAYS;
use crate::error::{InsightsError, InsightsResult};
use crate::types::{DailySnapshot, SleepAnalysis};

pub const MAX_WINDOW_DAYS: u32 = 90;

pub struct AppState {
    pub service: SleepInsightsService,
    /// `None` when no recorder is installed, e.g. in tests.
    pub metrics: Option<PrometheusHandle>,
}

#[derive(Debug, Deserialize)]
pub struct SleepAnalysisParams {
    pub days: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotParams {
    pub date: Option<String>,
}

pub fn parse_days(raw: Option<&str>) -> InsightsResult<u32> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_WINDOW_DAYS);
    };
    match raw.parse::<u32>() {
        Ok(days) if (1..=MAX_WINDOW_DAYS).contains(&days) => Ok(days),
        _ => Err(InsightsError::Validation(format!(
            "days must be an integer between 1 and {MAX_WINDOW_DAYS}, got {raw}"
        ))),
    }
}

pub fn parse_date(raw: Option<&str>) -> InsightsResult<Option<NaiveDate>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| InsightsError::Validation(format!("date must be YYYY-MM-DD, got {raw}")))
}

#[debug_handler]
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[debug_handler]
async fn sleep_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SleepAnalysisParams>,
) -> InsightsResult<Json<SleepAnalysis>> {
    let days = parse_days(params.days.as_deref())?;
    Ok(Json(state.service.get_sleep_analysis(days).await))
}

#[debug_handler]
async fn sleep_analysis_schema() -> impl IntoResponse {
    Json(schemars::schema_for!(SleepAnalysis))
}

#[debug_handler]
async fn daily_snapshot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SnapshotParams>,
) -> InsightsResult<Json<DailySnapshot>> {
    let date = parse_date(params.date.as_deref())?;
    Ok(Json(state.service.get_daily_snapshot(date).await))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/sleep/analysis", get(sleep_analysis))
        .route("/api/sleep/analysis/schema", get(sleep_analysis_schema))
        .route("/api/garmin/details", get(daily_snapshot))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_default_and_bounds() {
        assert_eq!(parse_days(None).unwrap(), 7);
        assert_eq!(parse_days(Some("")).unwrap(), 7);
        assert_eq!(parse_days(Some("1")).unwrap(), 1);
        assert_eq!(parse_days(Some("90")).unwrap(), 90);
        assert!(parse_days(Some("0")).is_err());
        assert!(parse_days(Some("91")).is_err());
        assert!(parse_days(Some("-3")).is_err());
        assert!(parse_days(Some("week")).is_err());
    }

    #[test]
    fn date_parsing() {
        assert_eq!(parse_date(None).unwrap(), None);
        assert_eq!(
            parse_date(Some("2026-10-15")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 15)
        );
        assert!(matches!(
            parse_date(Some("15/10/2026")),
            Err(InsightsError::Validation(_))
        ));
    }
}
