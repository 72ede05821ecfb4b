//! In-memory document store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::DocumentStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Collection {
    docs: HashMap<String, Value>,
    /// Ids in insertion order
    order: Vec<String>,
}

// == In-Memory Store ==
/// Process-local document store. Unique fields are declared up front with
/// [`with_unique_index`](Self::with_unique_index) and checked under the same
/// write lock as the insert.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    unique: HashMap<String, HashSet<String>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `field` unique within `collection`.
    pub fn with_unique_index(mut self, collection: &str, field: &str) -> Self {
        self.unique
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string());
        self
    }

    /// Returns the first unique field of `doc` already taken by another id.
    fn unique_conflict(&self, collection: &str, coll: &Collection, id: &str, doc: &Value) -> Option<String> {
        let fields = self.unique.get(collection)?;
        fields
            .iter()
            .find(|field| {
                let Some(wanted) = doc.get(field.as_str()) else {
                    return false;
                };
                coll.docs
                    .iter()
                    .any(|(other_id, other)| other_id != id && other.get(field.as_str()) == Some(wanted))
            })
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();

        if coll.docs.contains_key(id) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field: "_id".to_string(),
            });
        }
        if let Some(field) = self.unique_conflict(collection, coll, id, &doc) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field,
            });
        }

        coll.docs.insert(id.to_string(), doc);
        coll.order.push(id.to_string());
        debug!("Inserted document {}/{}", collection, id);
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        let coll = collections.get_mut(collection).ok_or_else(not_found)?;

        if !coll.docs.contains_key(id) {
            return Err(not_found());
        }
        if let Some(field) = self.unique_conflict(collection, coll, id, &doc) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field,
            });
        }

        coll.docs.insert(id.to_string(), doc);
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|coll| coll.docs.get(id))
            .cloned())
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        let Some(coll) = collections.get(collection) else {
            return Ok(None);
        };

        Ok(coll
            .order
            .iter()
            .filter_map(|id| coll.docs.get(id))
            .find(|doc| doc.get(field) == Some(value))
            .cloned())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|coll| {
                coll.order
                    .iter()
                    .filter_map(|id| coll.docs.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
