//! Counter API endpoints.
//!
//! - `GET  /v1/series` : registered series with display settings
//! - `POST /v1/series` : register / update display settings
//! - `POST /v1/events` : count an event
//! - `POST /v1/chart`  : render selected series

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use statdeck_core::error::{ErrorCode, StatError};
use statdeck_core::{Color, DisplayMode, Registration, StatEvent, Timestamp};

use crate::app_state::AppState;

/// Map an error to its HTTP status and a stable JSON body.
pub fn error_response(err: &StatError) -> Response {
    let status = match err.code() {
        ErrorCode::BadRequest | ErrorCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ErrorCode::UnknownSeries => StatusCode::NOT_FOUND,
        ErrorCode::RenderFailed | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = json!({ "code": err.code().as_str(), "msg": err.to_string() });
    (status, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
pub struct SeriesView {
    pub key: String,
    pub module_type: String,
    pub name: String,
    pub mode: DisplayMode,
    pub color: Color,
    pub buckets: usize,
}

pub async fn list_series(State(state): State<AppState>) -> Json<Vec<SeriesView>> {
    let views: Vec<SeriesView> = state.with_store(|s| {
        s.series()
            .map(|series| SeriesView {
                key: series.key(),
                module_type: series.id().module_type().to_string(),
                name: series.id().name().to_string(),
                mode: series.mode(),
                color: series.color().clone(),
                buckets: series.bucket_count(),
            })
            .collect()
    });
    Json(views)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterReq {
    pub name: String,
    pub module_type: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub mode: DisplayMode,
}

pub async fn register_series(
    State(state): State<AppState>,
    Json(req): Json<RegisterReq>,
) -> Response {
    if req.name.is_empty() || req.module_type.is_empty() {
        return error_response(&StatError::BadRequest(
            "name and module_type must not be empty".into(),
        ));
    }
    let outcome =
        state.with_store(|s| s.register(&req.name, &req.module_type, req.color, req.mode));
    match outcome {
        Registration::Created => StatusCode::CREATED.into_response(),
        Registration::Updated => StatusCode::NO_CONTENT.into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestReq {
    pub name: String,
    pub module_type: String,
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    1
}

pub async fn ingest_event(State(state): State<AppState>, Json(req): Json<IngestReq>) -> Response {
    if req.count < 1 {
        return error_response(&StatError::BadRequest("count must be >= 1".into()));
    }
    let event = StatEvent::new(req.name, req.module_type).with_count(req.count);
    let accepted = state.with_store(|s| s.ingest_at(&event, Timestamp::now()));
    if accepted {
        StatusCode::ACCEPTED.into_response()
    } else {
        error_response(&StatError::UnknownSeries(event.id.key()))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ChartReq {
    #[serde(default)]
    pub selectors: Vec<String>,
}

pub async fn chart(State(state): State<AppState>, Json(req): Json<ChartReq>) -> Response {
    match state.render_chart(&req.selectors, Timestamp::now()) {
        Some(image) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, state.content_type())],
            image,
        )
            .into_response(),
        // nothing matched, or the renderer failed (already logged)
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
