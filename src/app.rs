use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

// Photos travel base64-encoded inside JSON bodies.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/catalog", get(handlers::get_catalog))
        .route("/api/report", get(handlers::get_report))
        .route("/api/facility", post(handlers::select_facility))
        .route("/api/task", post(handlers::update_task))
        .route("/api/photo", get(handlers::get_photo).post(handlers::attach_photo))
        .route("/api/metadata", post(handlers::update_metadata))
        .route("/api/save", post(handlers::save))
        .route("/api/reload", post(handlers::reload))
        .route("/api/reset", post(handlers::reset))
        .route("/api/export/csv", get(handlers::export_csv))
        .route("/api/share", get(handlers::share))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
