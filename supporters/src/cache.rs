//! TTL bounded cache over a [`Storage`] backend.
//!
//! Entries are stored as `{"data": ..., "timestamp": <epoch ms>}`. An entry is
//! valid while `now - timestamp <= ttl`; expired and unparsable entries behave
//! exactly like missing ones, expired ones are removed on read.
//! Nothing in here fails: a broken backend turns the cache into a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::storage::{CacheError, Storage};

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64,
}

pub struct CacheStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    disabled: AtomicBool,
}

impl<S: Storage> CacheStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: Storage, C: Clock> CacheStore<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        CacheStore {
            storage,
            clock,
            disabled: AtomicBool::new(false),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        if ttl.is_zero() || self.disabled.load(Ordering::Relaxed) {
            return None;
        }
        match self.read(key, ttl) {
            Ok(data) => data,
            Err(err) => {
                self.handle(key, err);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, ttl: Duration, data: &T) {
        if ttl.is_zero() || self.disabled.load(Ordering::Relaxed) {
            return;
        }
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now_millis(),
        };
        let result = serde_json::to_string(&entry)
            .map_err(CacheError::from)
            .and_then(|raw| self.storage.set_item(key, raw));
        match result {
            Ok(()) => debug!("Cached {}", key),
            Err(err) => self.handle(key, err),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Result<Option<T>, CacheError> {
        let raw = match self.storage.get_item(key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let entry = serde_json::from_str::<CacheEntry<T>>(&raw)?;
        let ttl = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let age = match self.clock.now_millis().checked_sub(entry.timestamp) {
            Some(age) => age,
            None => {
                debug!("Cache entry {} has unusable timestamp {}", key, entry.timestamp);
                self.storage.remove_item(key)?;
                return Ok(None);
            }
        };
        if age > ttl {
            debug!("Cache entry {} expired {} ms ago", key, age.saturating_sub(ttl));
            self.storage.remove_item(key)?;
            return Ok(None);
        }
        debug!("Cache hit {}", key);
        Ok(Some(entry.data))
    }

    fn handle(&self, key: &str, err: CacheError) {
        match err {
            CacheError::Corrupt(err) => debug!("Ignoring cache entry {}: {}", key, err),
            CacheError::Unavailable(reason) => {
                warn!("Cache disabled for this session: {}", reason);
                self.disabled.store(true, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::atomic::AtomicI64;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub(crate) struct ManualClock(pub(crate) Arc<AtomicI64>);

    impl ManualClock {
        pub(crate) fn advance(&self, millis: i64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Fails every call, like a store in private browsing mode.
    struct DeniedStorage;

    impl Storage for DeniedStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("denied".to_string()))
        }

        fn set_item(&self, _key: &str, _value: String) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("denied".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("denied".to_string()))
        }
    }

    const TTL: Duration = Duration::from_millis(1000);

    fn store() -> (CacheStore<Arc<MemoryStorage>, ManualClock>, Arc<MemoryStorage>, ManualClock) {
        let storage = Arc::new(MemoryStorage::default());
        let clock = ManualClock::default();
        (CacheStore::with_clock(storage.clone(), clock.clone()), storage, clock)
    }

    #[test]
    fn hit_within_ttl() {
        let (cache, _, clock) = store();
        cache.set("k", TTL, &vec![1, 2, 3]);
        clock.advance(1000);
        assert_eq!(cache.get::<Vec<i32>>("k", TTL), Some(vec![1, 2, 3]));
    }

    #[test]
    fn expired_entry_is_removed() {
        let (cache, storage, clock) = store();
        cache.set("k", TTL, &"value");
        clock.advance(1001);
        assert_eq!(cache.get::<String>("k", TTL), None);
        assert!(storage.get_item("k").unwrap().is_none());
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let (cache, storage, _) = store();
        storage.set_item("k", "{not json".to_string()).unwrap();
        assert_eq!(cache.get::<String>("k", TTL), None);
        cache.set("k", TTL, &"fresh");
        assert_eq!(cache.get::<String>("k", TTL).as_deref(), Some("fresh"));
    }

    #[test]
    fn overflowing_timestamp_is_a_miss() {
        let (cache, storage, clock) = store();
        clock.advance(1000);
        storage
            .set_item("k", format!(r#"{{"data":"v","timestamp":{}}}"#, i64::MIN))
            .unwrap();
        assert_eq!(cache.get::<String>("k", Duration::from_secs(60)), None);
        assert!(storage.get_item("k").unwrap().is_none());
    }

    #[test]
    fn huge_ttl_keeps_entries() {
        let (cache, _, clock) = store();
        let forever = Duration::from_millis(u64::MAX);
        cache.set("k", forever, &"value");
        clock.advance(1_000_000);
        assert_eq!(cache.get::<String>("k", forever).as_deref(), Some("value"));
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let (cache, storage, _) = store();
        cache.set("k", Duration::ZERO, &"value");
        assert!(storage.get_item("k").unwrap().is_none());
        storage
            .set_item("k", r#"{"data":"value","timestamp":0}"#.to_string())
            .unwrap();
        assert_eq!(cache.get::<String>("k", Duration::ZERO), None);
    }

    #[test]
    fn stored_envelope_shape() {
        let (cache, storage, clock) = store();
        clock.advance(42);
        cache.set("k", TTL, &"value");
        assert_eq!(
            storage.get_item("k").unwrap().as_deref(),
            Some(r#"{"data":"value","timestamp":42}"#)
        );
    }

    #[test]
    fn unavailable_storage_degrades_to_no_cache() {
        let cache = CacheStore::with_clock(DeniedStorage, ManualClock::default());
        cache.set("k", TTL, &"value");
        assert_eq!(cache.get::<String>("k", TTL), None);
        assert!(cache.disabled.load(Ordering::Relaxed));
    }
}
