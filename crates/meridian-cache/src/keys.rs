//! Cache key generators for consistent key naming.

use meridian_core::UserId;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "meridian:cache";

/// Generate a cache key for a user record by ID.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    format!("{}:user:id:{}", CACHE_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_by_id_key() {
        let id = UserId::new();
        let key = user_by_id(id);
        assert!(key.starts_with("meridian:cache:user:id:"));
        assert!(key.contains(&id.to_string()));
    }
}
