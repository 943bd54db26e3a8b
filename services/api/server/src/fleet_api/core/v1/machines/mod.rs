use axum::Router;
use axum::extract::DefaultBodyLimit;

pub mod analyze;

// A full analysis request of ~1M readings is a few hundred MB of JSON
const MAX_ANALYZE_BODY_BYTES: usize = 512 * 1024 * 1024;

pub fn get_routes(state: crate::AppState) -> Router {
    Router::new()
        .route("/analyze", axum::routing::post(analyze::handler::handler))
        .layer(DefaultBodyLimit::max(MAX_ANALYZE_BODY_BYTES))
        .with_state(state)
}
