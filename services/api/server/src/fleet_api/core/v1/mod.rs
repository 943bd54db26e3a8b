use axum::Router;

pub(crate) mod machines;

pub fn get_routes(state: crate::AppState) -> Router {
    Router::new().nest("/machines", machines::get_routes(state))
}
