//! User service: profile creation and cached lookup.

use crate::dto::{CreateUserRequest, UserResponse};
use async_trait::async_trait;
use meridian_cache::UserCache;
use meridian_core::{MeridianError, MeridianResult, User, UserId, ValidateExt};
use meridian_repository::UserRepository;
use std::sync::Arc;
use tracing::{debug, error, info};

/// User service trait.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Creates a new user profile.
    async fn create_user(&self, request: CreateUserRequest) -> MeridianResult<UserResponse>;

    /// Gets a user by ID, reading through the cache.
    async fn get_user(&self, id: UserId) -> MeridianResult<UserResponse>;
}

/// User service implementation.
///
/// Holds typed references to exactly the capabilities it needs: the user
/// catalogue and the user-record cache.
pub struct UserServiceImpl {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn UserCache>,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<dyn UserCache>) -> Self {
        Self { users, cache }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(&self, request: CreateUserRequest) -> MeridianResult<UserResponse> {
        debug!("Creating user: {}", request.email);

        request.validate_request()?;

        // Email is the profile identifier; uniqueness is checked explicitly
        // before insert, with the catalogue's unique constraint as backstop.
        if self.users.exists_by_email(&request.email).await? {
            return Err(MeridianError::Conflict(format!(
                "Email '{}' is already registered",
                request.email
            )));
        }

        let user = User::new(request.name, request.email, request.location);
        let saved = self.users.create(&user).await?;

        info!("User created: {}", saved.id);
        Ok(UserResponse::from(saved))
    }

    async fn get_user(&self, id: UserId) -> MeridianResult<UserResponse> {
        debug!("Getting user: {}", id);

        // Cache probe first; any cache failure has already been logged and
        // surfaces here as a miss, so the catalogue path always proceeds.
        if let Some(user) = self.cache.get(id).await {
            debug!("Cache hit for user: {}", id);
            return Ok(UserResponse::from(user));
        }

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| MeridianError::not_found("User", id))?;

        if let Err(e) = self.cache.set(&user).await {
            error!("Failed to cache user {}: {}", id, e);
        }

        Ok(UserResponse::from(user))
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock user repository for testing.
    #[derive(Default)]
    struct MockUserRepository {
        users: Mutex<HashMap<UserId, User>>,
        find_calls: AtomicUsize,
    }

    impl MockUserRepository {
        fn with_user(user: User) -> Self {
            let repo = Self::default();
            repo.users.lock().unwrap().insert(user.id, user);
            repo
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create(&self, user: &User) -> MeridianResult<User> {
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(user.clone())
        }

        async fn find_by_id(&self, id: UserId) -> MeridianResult<Option<User>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> MeridianResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn exists_by_email(&self, email: &str) -> MeridianResult<bool> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .any(|u| u.email.eq_ignore_ascii_case(email)))
        }
    }

    /// Mock user cache for testing.
    #[derive(Default)]
    struct MockUserCache {
        entries: Mutex<HashMap<UserId, User>>,
        fail_set: AtomicBool,
    }

    #[async_trait]
    impl UserCache for MockUserCache {
        async fn get(&self, id: UserId) -> Option<User> {
            self.entries.lock().unwrap().get(&id).cloned()
        }

        async fn set(&self, user: &User) -> MeridianResult<()> {
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(MeridianError::Cache("cache write refused".to_string()));
            }
            self.entries.lock().unwrap().insert(user.id, user.clone());
            Ok(())
        }

        async fn invalidate(&self, id: UserId) -> MeridianResult<()> {
            self.entries.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    fn test_user() -> User {
        User::new("Ada".to_string(), "ada@example.com".to_string(), None)
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let repo = Arc::new(MockUserRepository::default());
        let cache = Arc::new(MockUserCache::default());
        let service = UserServiceImpl::new(repo, cache);

        let response = service
            .create_user(CreateUserRequest {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                location: None,
            })
            .await
            .unwrap();

        assert_eq!(response.name, "Ada");
        assert_eq!(response.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let repo = Arc::new(MockUserRepository::with_user(test_user()));
        let cache = Arc::new(MockUserCache::default());
        let service = UserServiceImpl::new(repo, cache);

        let result = service
            .create_user(CreateUserRequest {
                name: "Other".to_string(),
                email: "ADA@example.com".to_string(),
                location: None,
            })
            .await;

        match result.unwrap_err() {
            MeridianError::Conflict(msg) => assert!(msg.contains("already registered")),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let repo = Arc::new(MockUserRepository::default());
        let cache = Arc::new(MockUserCache::default());
        let service = UserServiceImpl::new(repo, cache);

        let result = service
            .create_user(CreateUserRequest {
                name: "Ada".to_string(),
                email: "not-an-email".to_string(),
                location: None,
            })
            .await;

        assert!(matches!(result, Err(MeridianError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_user_reads_through_and_populates_cache() {
        let user = test_user();
        let id = user.id;
        let repo = Arc::new(MockUserRepository::with_user(user));
        let cache = Arc::new(MockUserCache::default());
        let service = UserServiceImpl::new(Arc::clone(&repo) as _, Arc::clone(&cache) as _);

        let response = service.get_user(id).await.unwrap();
        assert_eq!(response.id, id);
        assert_eq!(repo.find_calls.load(Ordering::SeqCst), 1);
        assert!(cache.entries.lock().unwrap().contains_key(&id));

        // second read is served from the cache
        service.get_user(id).await.unwrap();
        assert_eq!(repo.find_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let repo = Arc::new(MockUserRepository::default());
        let cache = Arc::new(MockUserCache::default());
        let service = UserServiceImpl::new(repo, cache);

        let result = service.get_user(UserId::new()).await;
        assert!(matches!(result, Err(MeridianError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_user_survives_cache_write_failure() {
        let user = test_user();
        let id = user.id;
        let repo = Arc::new(MockUserRepository::with_user(user));
        let cache = Arc::new(MockUserCache::default());
        cache.fail_set.store(true, Ordering::SeqCst);
        let service = UserServiceImpl::new(repo, cache);

        // the catalogue path still succeeds; the cache failure is only logged
        let response = service.get_user(id).await.unwrap();
        assert_eq!(response.id, id);
    }
}
