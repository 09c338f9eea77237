use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// String-keyed value store with one fixed time-to-live chosen at
/// construction. Entries are evicted lazily when read past their expiry;
/// there is no background sweep and no size limit. Re-setting a key resets
/// its expiry. Intended for memoizing derived catalog results at a
/// boundary; the catalog itself never consults it.
pub struct TtlCache<V> {
    entries: HashMap<String, Entry<V>>,
    ttl: Duration,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn from_ttl_seconds(ttl_seconds: u64) -> Self {
        Self::new(Duration::from_secs(ttl_seconds))
    }

    pub fn get(&mut self, key: &str) -> Option<&V> {
        let expired = match self.entries.get(key) {
            Some(entry) => Instant::now() > entry.expires_at,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_stored_value_before_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.set("manifest:foxes", 7u32);
        assert_eq!(cache.get("manifest:foxes"), Some(&7));
        assert_eq!(cache.get("manifest:wolves"), None);
    }

    #[test]
    fn expired_entries_are_evicted_on_get() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.set("k", 1u32);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_replaces_value_and_resets_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", 1u32);
        cache.set("k", 2u32);
        assert_eq!(cache.get("k"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1u32);
        cache.set("b", 2u32);
        cache.clear();
        assert!(cache.is_empty());
    }
}
