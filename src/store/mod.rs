//! Document Store Module
//!
//! Persistence seam: JSON documents grouped in named collections and keyed
//! by string id. Services talk to [`DocumentStore`]; the server wires in
//! [`InMemoryDocumentStore`].

mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::StoreError;

pub use memory::InMemoryDocumentStore;

/// Collection holding user records.
pub const USERS_COLLECTION: &str = "users";

/// Collection holding item records.
pub const ITEMS_COLLECTION: &str = "items";

/// Shareable store handle.
pub type DynDocumentStore = Arc<dyn DocumentStore>;

// == Document Store Trait ==
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document. Fails with [`StoreError::Duplicate`] on an id
    /// collision or when a unique field already holds the same value.
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError>;

    /// Re-saves an existing document wholesale, the write a record goes
    /// through after creation when any of its fields change. Fails with
    /// [`StoreError::NotFound`] for an unknown id.
    async fn replace(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError>;

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// First document whose top-level `field` equals `value`.
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Value>, StoreError>;

    /// Every document in insertion order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
}

// == Typed Helpers ==
pub fn encode<T: Serialize>(record: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(record)?)
}

pub fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, StoreError> {
    Ok(serde_json::from_value(doc)?)
}

pub fn decode_opt<T: DeserializeOwned>(doc: Option<Value>) -> Result<Option<T>, StoreError> {
    doc.map(decode).transpose()
}
