use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/statistics", get(handlers::get_statistics))
        .route(
            "/api/snapshot",
            get(handlers::get_snapshot).put(handlers::put_snapshot),
        )
        .with_state(state)
}
