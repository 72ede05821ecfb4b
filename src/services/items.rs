//! Item service: creation and read-through lookups.

use tracing::{debug, info, warn};

use crate::cache::{item_key, SharedCache, ALL_ITEMS_KEY, ITEM_KEY_PREFIX};
use crate::error::{AppError, Result};
use crate::models::{requests::item_violations, Item};
use crate::store::{decode, decode_opt, encode, DynDocumentStore, ITEMS_COLLECTION};

// == Item Service ==
#[derive(Clone)]
pub struct ItemService {
    store: DynDocumentStore,
    cache: SharedCache,
    /// TTL in seconds of a cached single item
    item_ttl: u64,
    /// TTL in seconds of the aggregate list entry
    all_items_ttl: u64,
}

impl ItemService {
    pub fn new(store: DynDocumentStore, cache: SharedCache, item_ttl: u64, all_items_ttl: u64) -> Self {
        Self {
            store,
            cache,
            item_ttl,
            all_items_ttl,
        }
    }

    // == Create ==
    /// Persists a new item, caches it by id and drops the stale aggregate.
    pub async fn create(&self, name: &str, price: f64, description: Option<&str>) -> Result<Item> {
        let violations = item_violations(Some(name), Some(price));
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let item = Item::new(name, price, description);
        self.store
            .insert(ITEMS_COLLECTION, &item.id, encode(&item)?)
            .await?;

        self.cache.delete(ALL_ITEMS_KEY).await;
        self.cache_item(&item).await;

        info!("Item created: {}", item.id);
        Ok(item)
    }

    // == Get All ==
    /// Serves the aggregate entry when live, otherwise reloads and repopulates.
    pub async fn get_all(&self) -> Result<Vec<Item>> {
        if let Some(items) = self.cache.get_json::<Vec<Item>>(ALL_ITEMS_KEY).await {
            return Ok(items);
        }

        let items = self
            .store
            .find_all(ITEMS_COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect::<std::result::Result<Vec<Item>, _>>()?;
        debug!("Loaded {} items from store", items.len());

        if let Err(e) = self
            .cache
            .set_json(ALL_ITEMS_KEY, &items, Some(self.all_items_ttl))
            .await
        {
            warn!("Failed to cache item list: {}", e);
        }
        Ok(items)
    }

    // == Get By Id ==
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Item>> {
        if let Some(item) = self.cache.get_json::<Item>(&item_key(id)).await {
            return Ok(Some(item));
        }

        let doc = self.store.find_by_id(ITEMS_COLLECTION, id).await?;
        let Some(item) = decode_opt::<Item>(doc)? else {
            return Ok(None);
        };
        self.cache_item(&item).await;
        Ok(Some(item))
    }

    // == Invalidate ==
    /// Drops one cached item, or all of them when `id` is `None`. The
    /// aggregate list is dropped either way. Returns entries removed.
    pub async fn invalidate(&self, id: Option<&str>) -> usize {
        let mut removed = match id {
            Some(id) => usize::from(self.cache.delete(&item_key(id)).await),
            None => self.cache.delete_prefix(ITEM_KEY_PREFIX).await,
        };
        removed += usize::from(self.cache.delete(ALL_ITEMS_KEY).await);
        debug!("Invalidated {} cached item entries", removed);
        removed
    }

    async fn cache_item(&self, item: &Item) {
        if let Err(e) = self
            .cache
            .set_json(&item_key(&item.id), item, Some(self.item_ttl))
            .await
        {
            warn!("Failed to cache item {}: {}", item.id, e);
        }
    }
}
