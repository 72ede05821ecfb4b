//! Services Module
//!
//! Business logic sitting between the HTTP handlers and the cache/store
//! pair. Both services follow the same read-through pattern: try the cache,
//! fall back to the store, repopulate.

mod items;
mod users;

pub use items::ItemService;
pub use users::{UserService, DUPLICATE_EMAIL_MESSAGE};
