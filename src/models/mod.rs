//! Records and wire DTOs
//!
//! Stored records (`User`, `Item`), the public user projection, request
//! bodies with their validation rules, and the response envelope.

pub mod item;
pub mod requests;
pub mod responses;
pub mod user;

pub use item::Item;
pub use requests::{CreateItemRequest, LoginRequest, RegisterRequest};
pub use responses::{ApiResponse, HealthResponse, StatsResponse};
pub use user::{normalize_email, User, UserPublic};
