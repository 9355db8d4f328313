//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/v1/series", get(api::list_series).post(api::register_series))
        .route("/v1/events", post(api::ingest_event))
        .route("/v1/chart", post(api::chart))
        .with_state(state)
}
