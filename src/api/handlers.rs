//! API Handlers
//!
//! Controllers: check request shape, delegate to a service, wrap the result
//! in the response envelope. Failures travel as [`AppError`] and are
//! rendered by its `IntoResponse` impl.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::credentials::PasswordHasher;
use crate::error::{AppError, CredentialError, Result};
use crate::models::{
    ApiResponse, CreateItemRequest, HealthResponse, Item, LoginRequest, RegisterRequest,
    StatsResponse, UserPublic,
};
use crate::services::{ItemService, UserService};
use crate::store::{DynDocumentStore, InMemoryDocumentStore, USERS_COLLECTION};

/// Application state shared across all handlers.
///
/// Built explicitly at startup and handed to the router; nothing here is a
/// process-wide global.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
    pub users: Arc<UserService>,
    pub items: Arc<ItemService>,
}

impl AppState {
    pub fn new(cache: SharedCache, users: UserService, items: ItemService) -> Self {
        Self {
            cache,
            users: Arc::new(users),
            items: Arc::new(items),
        }
    }

    /// Default wiring: one shared cache and an in-memory document store with
    /// a unique email index.
    pub fn from_config(config: &Config) -> std::result::Result<Self, CredentialError> {
        let cache = SharedCache::with_capacity(config.max_entries, config.default_ttl);
        let store: DynDocumentStore =
            Arc::new(InMemoryDocumentStore::new().with_unique_index(USERS_COLLECTION, "email"));
        let hasher = PasswordHasher::new(config.hash_params)?;

        let users = UserService::new(store.clone(), cache.clone(), hasher, config.user_cache_ttl);
        let items = ItemService::new(
            store,
            cache.clone(),
            config.item_cache_ttl,
            config.items_all_cache_ttl,
        );

        Ok(Self::new(cache, users, items))
    }
}

/// Unwraps a JSON body, turning axum's rejection into a 400 envelope.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

fn check(violations: Vec<String>) -> Result<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

/// Handler for POST /users/register
pub async fn register_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserPublic>>)> {
    let req = json_body(payload)?;
    check(req.validate())?;

    let user = state
        .users
        .register(
            req.first_name.as_deref().unwrap_or_default(),
            req.last_name.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User registered successfully", user)),
    ))
}

/// Handler for POST /users/login
pub async fn login_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserPublic>>> {
    let req = json_body(payload)?;
    check(req.validate())?;

    let user = state
        .users
        .authenticate(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(ApiResponse::ok("Login successful", user)))
}

/// Handler for POST /items
pub async fn create_item_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>)> {
    let req = json_body(payload)?;
    check(req.validate())?;

    let item = state
        .items
        .create(
            req.name.as_deref().unwrap_or_default(),
            req.price.unwrap_or_default(),
            req.description.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Item created successfully", item)),
    ))
}

/// Handler for GET /items
pub async fn list_items_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Item>>>> {
    let items = state.items.get_all().await?;
    debug!("Listing {} items", items.len());
    Ok(Json(ApiResponse::ok("Items retrieved successfully", items)))
}

/// Handler for GET /items/:id
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Item>>> {
    let item = state
        .items
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Item retrieved successfully", item)))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<ApiResponse<StatsResponse>> {
    let stats = state.cache.stats().await;
    Json(ApiResponse::ok("Cache statistics", StatsResponse::from(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok("Service is healthy", HealthResponse::healthy()))
}

/// Fallback for unknown routes.
pub async fn fallback_handler() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Fallback for a known path hit with a method it does not serve.
pub async fn method_not_allowed_handler() -> AppError {
    AppError::MethodNotAllowed
}
