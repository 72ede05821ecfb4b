//! User service: registration, authentication and cached lookup by email.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::{user_key, SharedCache, USER_KEY_PREFIX};
use crate::credentials::PasswordHasher;
use crate::error::{AppError, Result, StoreError};
use crate::models::{normalize_email, User, UserPublic};
use crate::store::{decode_opt, encode, DynDocumentStore, USERS_COLLECTION};

/// Outward message for a taken email.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";

// == User Service ==
#[derive(Clone)]
pub struct UserService {
    store: DynDocumentStore,
    cache: SharedCache,
    hasher: PasswordHasher,
    /// TTL in seconds of cached public projections
    cache_ttl: u64,
}

impl UserService {
    pub fn new(
        store: DynDocumentStore,
        cache: SharedCache,
        hasher: PasswordHasher,
        cache_ttl: u64,
    ) -> Self {
        Self {
            store,
            cache,
            hasher,
            cache_ttl,
        }
    }

    // == Register ==
    /// Creates a user with a hashed password and caches its public view.
    ///
    /// A cached projection or a stored record for the email means it is taken.
    /// The existence check and the insert are not atomic; the store's unique
    /// email index settles a race between two concurrent registrations.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserPublic> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::validation("email is required"));
        }
        debug!("Registering user: {}", email);

        if self.cache.get(&user_key(&email)).await.is_some()
            || self.find_record(&email).await?.is_some()
        {
            return Err(AppError::AlreadyExists(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let password_hash = self.hasher.hash_async(password.to_string()).await?;
        let user = User::new(first_name, last_name, &email, password_hash);

        match self
            .store
            .insert(USERS_COLLECTION, &user.id, encode(&user)?)
            .await
        {
            Err(StoreError::Duplicate { .. }) => {
                return Err(AppError::AlreadyExists(DUPLICATE_EMAIL_MESSAGE.to_string()))
            }
            other => other?,
        }

        let public = user.to_public();
        self.cache_public(&public).await;

        info!("User registered: {}", public.id);
        Ok(public)
    }

    // == Authenticate ==
    /// Checks credentials. An unknown email and a wrong password produce the
    /// same [`AppError::InvalidCredentials`].
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserPublic> {
        let email = normalize_email(email);

        let Some(user) = self.find_record(&email).await? else {
            debug!("Login rejected: no account");
            return Err(AppError::InvalidCredentials);
        };

        let matches = self
            .hasher
            .verify_async(user.password.clone(), password.to_string())
            .await
            .map_err(|e| {
                error!("Stored credential for user {} is unusable: {}", user.id, e);
                AppError::from(e)
            })?;

        if !matches {
            debug!("Login rejected: password mismatch for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let public = user.to_public();
        self.cache_public(&public).await;

        info!("User authenticated: {}", public.id);
        Ok(public)
    }

    // == Find By Email ==
    /// Read-through lookup of the public projection.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserPublic>> {
        let email = normalize_email(email);

        if let Some(cached) = self.cache.get_json::<UserPublic>(&user_key(&email)).await {
            return Ok(Some(cached));
        }

        let Some(user) = self.find_record(&email).await? else {
            return Ok(None);
        };
        let public = user.to_public();
        self.cache_public(&public).await;
        Ok(Some(public))
    }

    // == Invalidate ==
    /// Drops one cached user, or every cached user when `email` is `None`.
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, email: Option<&str>) -> usize {
        let removed = match email {
            Some(email) => usize::from(self.cache.delete(&user_key(&normalize_email(email))).await),
            None => self.cache.delete_prefix(USER_KEY_PREFIX).await,
        };
        debug!("Invalidated {} cached user entries", removed);
        removed
    }

    /// Full stored record, password hash included.
    async fn find_record(&self, email: &str) -> Result<Option<User>> {
        let doc = self
            .store
            .find_one(USERS_COLLECTION, "email", &Value::String(email.to_string()))
            .await?;
        Ok(decode_opt(doc)?)
    }

    async fn cache_public(&self, public: &UserPublic) {
        if let Err(e) = self
            .cache
            .set_json(&user_key(&public.email), public, Some(self.cache_ttl))
            .await
        {
            warn!("Failed to cache user {}: {}", public.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::credentials::HashParams;
    use crate::error::INVALID_CREDENTIALS_MESSAGE;
    use crate::store::{DocumentStore, InMemoryDocumentStore};

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn service_with(cache_ttl: u64) -> (UserService, SharedCache, Arc<InMemoryDocumentStore>) {
        let store =
            Arc::new(InMemoryDocumentStore::new().with_unique_index(USERS_COLLECTION, "email"));
        let cache = SharedCache::with_capacity(100, 300);
        let service = UserService::new(store.clone(), cache.clone(), fast_hasher(), cache_ttl);
        (service, cache, store)
    }

    fn service() -> (UserService, SharedCache, Arc<InMemoryDocumentStore>) {
        service_with(3600)
    }

    #[tokio::test]
    async fn test_register_returns_public_projection() {
        let (users, cache, store) = service();

        let public = users
            .register("Ada", "Lovelace", " Ada@Example.com ", "secret")
            .await
            .unwrap();
        assert_eq!(public.email, "ada@example.com");
        assert!(!public.verified);

        let doc = store
            .find_by_id(USERS_COLLECTION, &public.id)
            .await
            .unwrap()
            .unwrap();
        let stored = doc["password"].as_str().unwrap();
        assert_ne!(stored, "secret");
        assert!(stored.starts_with("$argon2id$"));

        let cached = cache.get_json::<UserPublic>("user:ada@example.com").await;
        assert_eq!(cached, Some(public));
    }

    #[tokio::test]
    async fn test_register_same_email_twice() {
        let (users, _, _) = service();

        users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await
            .unwrap();
        let second = users
            .register("Other", "Person", "ADA@example.com", "another")
            .await;

        match second {
            Err(AppError::AlreadyExists(msg)) => assert_eq!(msg, DUPLICATE_EMAIL_MESSAGE),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_email_already_cached() {
        let (users, cache, store) = service();
        let cached = User::new("Ada", "Lovelace", "ada@example.com", "x".into()).to_public();
        cache
            .set_json("user:ada@example.com", &cached, None)
            .await
            .unwrap();

        let result = users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
        assert!(store.find_all(USERS_COLLECTION).await.unwrap().is_empty());
    }

    /// Store whose email lookup never sees existing users, as when another
    /// registration lands between the existence check and the insert.
    struct StaleLookupStore {
        inner: Arc<InMemoryDocumentStore>,
    }

    #[async_trait::async_trait]
    impl DocumentStore for StaleLookupStore {
        async fn insert(
            &self,
            collection: &str,
            id: &str,
            doc: Value,
        ) -> std::result::Result<(), StoreError> {
            self.inner.insert(collection, id, doc).await
        }

        async fn replace(
            &self,
            collection: &str,
            id: &str,
            doc: Value,
        ) -> std::result::Result<(), StoreError> {
            self.inner.replace(collection, id, doc).await
        }

        async fn find_by_id(
            &self,
            collection: &str,
            id: &str,
        ) -> std::result::Result<Option<Value>, StoreError> {
            self.inner.find_by_id(collection, id).await
        }

        async fn find_one(
            &self,
            _collection: &str,
            _field: &str,
            _value: &Value,
        ) -> std::result::Result<Option<Value>, StoreError> {
            Ok(None)
        }

        async fn find_all(&self, collection: &str) -> std::result::Result<Vec<Value>, StoreError> {
            self.inner.find_all(collection).await
        }
    }

    #[tokio::test]
    async fn test_register_insert_conflict_is_already_exists() {
        let (users, _, store) = service();
        users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await
            .unwrap();

        let stale = UserService::new(
            Arc::new(StaleLookupStore {
                inner: store.clone(),
            }),
            SharedCache::with_capacity(100, 300),
            fast_hasher(),
            3600,
        );
        let result = stale
            .register("Other", "Person", "ada@example.com", "another")
            .await;

        match result {
            Err(AppError::AlreadyExists(msg)) => assert_eq!(msg, DUPLICATE_EMAIL_MESSAGE),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
        assert_eq!(store.find_all(USERS_COLLECTION).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_store_one_user() {
        let (users, _, store) = service();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let users = users.clone();
                tokio::spawn(async move {
                    users
                        .register("Racer", &i.to_string(), "race@example.com", "secret")
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::AlreadyExists(msg)) => {
                    assert_eq!(msg, DUPLICATE_EMAIL_MESSAGE);
                    duplicates += 1;
                }
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(store.find_all(USERS_COLLECTION).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_blank_email_is_validation_error() {
        let (users, _, _) = service();
        let result = users.register("Ada", "Lovelace", "   ", "secret").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_authenticate_success_refreshes_cache() {
        let (users, cache, _) = service();
        users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await
            .unwrap();
        users.invalidate(None).await;

        let public = users.authenticate("ADA@example.com", "secret").await.unwrap();
        assert_eq!(public.email, "ada@example.com");
        assert!(cache.get("user:ada@example.com").await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_identical() {
        let (users, _, _) = service();
        users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await
            .unwrap();

        let unknown = users.authenticate("nobody@example.com", "secret").await.unwrap_err();
        let wrong = users.authenticate("ada@example.com", "wrong").await.unwrap_err();

        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(wrong.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_internal() {
        let (users, _, store) = service();
        let user = User::new("Ada", "Lovelace", "ada@example.com", "garbage".into());
        store
            .insert(USERS_COLLECTION, &user.id, encode(&user).unwrap())
            .await
            .unwrap();

        let result = users.authenticate("ada@example.com", "secret").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_find_by_email_reads_through() {
        let (users, cache, _) = service();
        let public = users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(users.invalidate(Some("Ada@Example.com")).await, 1);
        assert!(cache.get("user:ada@example.com").await.is_none());

        let found = users.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found, Some(public));
        assert!(cache.get("user:ada@example.com").await.is_some());

        assert!(users.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cached_user_not_returned_after_ttl() {
        let (users, cache, _) = service_with(0);
        users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await
            .unwrap();

        assert!(cache.get("user:ada@example.com").await.is_none());
        // Lookups still succeed from the store.
        assert!(users.find_by_email("ada@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cached_user_expires_after_one_second() {
        let (users, cache, _) = service_with(1);
        users
            .register("Ada", "Lovelace", "ada@example.com", "secret")
            .await
            .unwrap();
        assert!(cache.get("user:ada@example.com").await.is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(cache.get("user:ada@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all_users() {
        let (users, cache, _) = service();
        users.register("A", "A", "a@example.com", "secret").await.unwrap();
        users.register("B", "B", "b@example.com", "secret").await.unwrap();
        cache.set("item:1", "{}".to_string(), None).await.unwrap();

        assert_eq!(users.invalidate(None).await, 2);
        assert!(cache.get("item:1").await.is_some());
    }
}
