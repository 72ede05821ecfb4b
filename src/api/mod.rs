//! API Module
//!
//! HTTP handlers and routing for the user and item endpoints.
//!
//! # Endpoints
//! - `POST /users/register`, `POST /users/login`
//! - `POST /items`, `GET /items`, `GET /items/:id`
//! - `GET /cache/stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
