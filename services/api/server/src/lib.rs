//! # Fleet API Server
//!
use crate::metrics::ServerMetrics;
use crate::shutdown::ShutdownCoordinator;
use axum::Json;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use telemetry::metrics::Telemetry;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer,
    trace::TraceLayer,
};
// Private API modules - internal implementation details
mod fleet_api;
pub mod shutdown;

// OpenAPI documentation module
pub mod openapi;

// Public modules - shared utilities and middleware
pub mod health;
pub mod metrics;
pub mod shared;

pub use fleet_api::core::v1::get_routes as get_fleet_api_v1_routes;

pub const VERSION: Option<&'static str> = option_env!("VERSION");

const DEFAULT_MAX_READINGS_PER_REQUEST: usize = 1_000_000;

/// Returns the OpenAPI documentation routes for Fleet v1 API
/// Includes Swagger UI and the OpenAPI JSON document with OpenAPI 3.0 compatibility fixes
pub fn get_openapi_routes() -> axum::Router {
    use axum::routing::get;
    use utoipa_swagger_ui::SwaggerUi;

    async fn openapi_3_0_handler() -> Json<serde_json::Value> {
        Json(openapi::FleetV1ApiDoc::openapi_json())
    }

    axum::Router::new()
        .route("/api-docs/openapi.json", get(openapi_3_0_handler))
        // Native OpenAPI 3.1 document for Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url(
            "/api-docs/openapi-3.1.json",
            openapi::FleetV1ApiDoc::openapi(),
        ))
}

async fn fallback_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested endpoint does not exist",
            "status": 404
        })),
    )
}

/// Full service router: probes, metrics, the v1 API and its documentation.
pub fn router(app_state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", {
            let state = app_state.clone();
            axum::routing::get(move || {
                let state = state.clone();
                async move { health::handler(state).await }
            })
        })
        .route(
            "/version",
            axum::routing::get(|| async { VERSION.unwrap_or("unknown") }),
        )
        .route("/metrics", {
            let telemetry = app_state.telemetry.clone();
            axum::routing::get(move || {
                let telemetry = telemetry.clone();
                async move {
                    (
                        StatusCode::OK,
                        [(
                            axum::http::header::CONTENT_TYPE,
                            "text/plain; charset=utf-8",
                        )],
                        telemetry.get_metrics().await,
                    )
                }
            })
        })
        .nest("/api/fleet/v1", get_fleet_api_v1_routes(app_state))
        .merge(get_openapi_routes())
        .fallback(fallback_handler)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::new())
}

#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<Telemetry<ServerMetrics>>,
    pub config: Arc<Config>,
    pub shutdown: Arc<ShutdownCoordinator>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    // Service port
    pub api_service_port: String,

    // Loggers
    pub rust_log: String,
    #[serde(default)]
    pub log_format: String,

    // Upper bound on readings accepted by one analysis request
    #[serde(default = "default_max_readings_per_request")]
    pub max_readings_per_request: usize,
}

fn default_max_readings_per_request() -> usize {
    DEFAULT_MAX_READINGS_PER_REQUEST
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        // Load .env file if present (useful when running outside docker-compose)
        match dotenv::dotenv() {
            Ok(path) => eprintln!("Loaded .env from: {}", path.display()),
            Err(e) => eprintln!("dotenv warning: {e}"),
        }

        envy::from_env::<Config>()
    }

    pub fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
