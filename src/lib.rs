//! Shopfront - user accounts and an item catalogue over HTTP
//!
//! Argon2 password credentials, a document store, and a process-local TTL
//! cache read through by the user and item lookups.

pub mod api;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
