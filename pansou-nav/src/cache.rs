//! Single-slot cache of the most recent search per (chat, user).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use pansou_search::SearchData;

/// Composite (chat, user) identity scoping one active search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: u64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: u64) -> SessionKey {
        SessionKey { chat_id, user_id }
    }
}

/// One completed search, immutable once stored.
///
/// Replaced wholesale by the next search under the same key; there is
/// no partial merge.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub keyword: String,
    pub results: SearchData,
    pub created_at: Instant,
}

impl SearchSession {
    pub fn new(keyword: impl Into<String>, results: SearchData) -> SearchSession {
        SearchSession {
            keyword: keyword.into(),
            results,
            created_at: Instant::now(),
        }
    }
}

/// Keyed store of the last search session per [`SessionKey`].
///
/// No TTL and no eviction: an entry lives until the same key searches
/// again or the process exits. Memory is bounded by the number of
/// distinct active users.
#[derive(Default)]
pub struct SearchCache {
    inner: Mutex<HashMap<SessionKey, Arc<SearchSession>>>,
}

impl SearchCache {
    pub fn new() -> SearchCache {
        SearchCache::default()
    }

    /// Store a session, unconditionally replacing any previous one.
    pub fn put(&self, key: SessionKey, session: SearchSession) {
        self.lock().insert(key, Arc::new(session));
    }

    /// The current session for a key. `None` means expired/unknown,
    /// not an error.
    pub fn get(&self, key: SessionKey) -> Option<Arc<SearchSession>> {
        self.lock().get(&key).cloned()
    }

    /// Number of live sessions, for status reporting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionKey, Arc<SearchSession>>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_on_unknown_key_is_none() {
        let cache = SearchCache::new();
        assert!(cache.get(SessionKey::new(1, 2)).is_none());
    }

    #[test]
    fn put_replaces_the_whole_session() {
        let cache = SearchCache::new();
        let key = SessionKey::new(10, 20);
        cache.put(key, SearchSession::new("foo", SearchData::default()));
        cache.put(key, SearchSession::new("bar", SearchData::default()));

        let session = cache.get(key).unwrap();
        assert_eq!(session.keyword, "bar");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_scoped_per_chat_and_user() {
        let cache = SearchCache::new();
        cache.put(
            SessionKey::new(1, 2),
            SearchSession::new("foo", SearchData::default()),
        );
        assert!(cache.get(SessionKey::new(1, 3)).is_none());
        assert!(cache.get(SessionKey::new(2, 2)).is_none());
    }
}
