//! API Routes
//!
//! Wires handlers, middleware and state into the Axum router.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_item_handler, fallback_handler, get_item_handler, health_handler, list_items_handler,
    login_handler, method_not_allowed_handler, register_handler, stats_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `POST /users/register` - Create an account
/// - `POST /users/login` - Check credentials
/// - `POST /items` - Create an item
/// - `GET /items` - List items
/// - `GET /items/:id` - Fetch one item
/// - `GET /cache/stats` - Cache counters
/// - `GET /health` - Liveness probe
///
/// Unknown paths answer with a 404 envelope, known paths with the wrong
/// method with a 405 envelope.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users/register", post(register_handler))
        .route("/users/login", post(login_handler))
        .route("/items", post(create_item_handler).get(list_items_handler))
        .route("/items/:id", get(get_item_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
