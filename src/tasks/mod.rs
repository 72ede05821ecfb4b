//! Background Tasks Module
//!
//! - Expiry sweep: drops expired cache entries at a fixed interval so dead
//!   entries do not occupy capacity until their key is read again.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
