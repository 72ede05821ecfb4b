//! Credentials Module
//!
//! One-way password hashing and verification.

mod hasher;

pub use hasher::{HashParams, PasswordHasher};
