//! Cache Store Module
//!
//! TTL cache combining a mutex-guarded HashMap with a background sweep task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::TimeDelta;
use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::cache::{CacheStats, Entry, MIN_SWEEP_PERIOD};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

/// State shared between the cache handle and its sweep task.
pub(crate) type SharedState<V> = Arc<Mutex<CacheState<V>>>;

// == Cache State ==
/// Everything guarded by the cache's single lock.
#[derive(Debug)]
pub(crate) struct CacheState<V> {
    entries: HashMap<String, Entry<V>>,
    stats: CacheStats,
}

impl<V: Clone> CacheState<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: String, payload: V) {
        self.entries.insert(key, Entry::new(payload));
    }

    /// Clones the payload under `key` and records a hit or a miss.
    pub(crate) fn lookup(&mut self, key: &str) -> Option<V> {
        let payload = self.entries.get(key).map(|entry| entry.payload.clone());

        if payload.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        payload
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    // == Sweep ==
    /// Removes every entry older than `interval` as of `now`.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn sweep(&mut self, interval: Duration, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_stale(interval, now));

        let removed = before - self.entries.len();
        self.stats.record_sweep(removed);
        removed
    }
}

// == TTL Cache ==
/// Concurrency-safe key-value cache whose entries expire after a fixed interval.
///
/// All reads and writes are serialized through one lock. A background task,
/// started at construction, wakes once per interval and removes every entry
/// older than the interval. Lookups do not check age themselves, so an entry
/// may still be returned for up to one sweep period after it logically
/// expired.
///
/// Each sweep scans the whole map while holding the lock. That is fine for the
/// few hundred entries a response cache holds; much larger caches would want
/// an expiry heap or sharded maps instead.
///
/// The sweep task stops when [`TtlCache::close`] is called or when the cache
/// is dropped.
#[derive(Debug)]
pub struct TtlCache<V> {
    state: SharedState<V>,
    /// Effective sweep period, also the maximum entry age
    interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

/// Cache of raw upstream response bodies keyed by request URL.
pub type ResponseCache = TtlCache<Bytes>;

impl<V> TtlCache<V>
where
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache whose entries live for `interval`, and starts its sweeper.
    ///
    /// # Errors
    /// - [`CacheError::InvalidInterval`] if `interval` is negative. No task is
    ///   spawned in that case.
    /// - [`CacheError::NoRuntime`] if called outside a Tokio runtime.
    pub fn new(interval: TimeDelta) -> Result<Self> {
        let interval = interval
            .to_std()
            .map_err(|_| CacheError::InvalidInterval(interval))?;
        Self::from_std(interval)
    }

    /// Creates a cache from a non-negative `std` duration.
    ///
    /// Intervals shorter than [`MIN_SWEEP_PERIOD`] are raised to it so the
    /// sweeper never spins.
    pub fn from_std(interval: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let interval = interval.max(MIN_SWEEP_PERIOD);

        let state = Arc::new(Mutex::new(CacheState::new()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = spawn_sweep_task(&runtime, Arc::clone(&state), interval, shutdown_rx);

        info!("TTL cache created with interval of {:?}", interval);

        Ok(Self {
            state,
            interval,
            shutdown_tx,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }

    // == Add ==
    /// Inserts or replaces the payload stored under `key`.
    ///
    /// Replacing an entry also resets its age.
    pub async fn add(&self, key: impl Into<String>, payload: V) {
        self.state.lock().await.insert(key.into(), payload);
    }

    // == Get ==
    /// Returns a copy of the payload stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.state.lock().await.lookup(key)
    }

    // == Close ==
    /// Stops the sweep task and waits for it to finish.
    ///
    /// Calling this more than once is harmless. The cache stays usable
    /// afterwards, but entries no longer expire.
    pub async fn close(&self) {
        self.shutdown_tx.send_replace(true);

        let handle = self.sweeper.lock().await.take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!("Sweep task ended abnormally: {}", err);
            }
            info!("TTL cache closed");
        }
    }

    /// Returns true once [`TtlCache::close`] has been called.
    pub fn is_closed(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    // == Stats ==
    /// Returns a snapshot of the cache's counters.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.total_entries = state.len();
        stats
    }

    /// Returns the effective sweep period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    // == Length ==
    /// Returns the number of stored entries, including ones awaiting a sweep.
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn bytes(data: &'static [u8]) -> Bytes {
        Bytes::from_static(data)
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let cache = ResponseCache::new(TimeDelta::seconds(5)).unwrap();

        cache.add("key1", bytes(b"value1")).await;

        assert_eq!(cache.get("key1").await, Some(bytes(b"value1")));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = ResponseCache::new(TimeDelta::seconds(5)).unwrap();

        assert_eq!(cache.get("nonexistent").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_payload() {
        let cache = ResponseCache::new(TimeDelta::seconds(5)).unwrap();

        cache.add("key1", bytes(b"value1")).await;
        cache.add("key1", bytes(b"value2")).await;

        assert_eq!(cache.get("key1").await, Some(bytes(b"value2")));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_key_and_payload() {
        let cache = ResponseCache::new(TimeDelta::seconds(5)).unwrap();

        cache.add("", Bytes::new()).await;

        assert_eq!(cache.get("").await, Some(Bytes::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_interval() {
        let cache = ResponseCache::new(TimeDelta::seconds(2)).unwrap();
        cache.add("X", Bytes::from(vec![1, 2, 3])).await;

        sleep(Duration::from_secs(1)).await;
        assert_eq!(cache.get("X").await, Some(Bytes::from(vec![1, 2, 3])));

        // With a paused clock ticks land exactly on multiples of the interval.
        // Age must exceed it, so the tick at t=2 keeps X and it is still
        // there just past t=3; removal happens at t=2T (the tick at t=4).
        sleep(Duration::from_millis(2100)).await;
        assert_eq!(cache.get("X").await, Some(Bytes::from(vec![1, 2, 3])));

        sleep(Duration::from_millis(901)).await;
        assert_eq!(cache.get("X").await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.swept, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_readable_until_swept() {
        let cache = ResponseCache::new(TimeDelta::seconds(2)).unwrap();
        cache.add("key", bytes(b"value")).await;

        // Logically expired at t=2.5, but no tick has seen it stale yet.
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(cache.get("key").await, Some(bytes(b"value")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_age() {
        let cache = ResponseCache::new(TimeDelta::seconds(2)).unwrap();
        cache.add("key", bytes(b"first")).await;

        sleep(Duration::from_secs(3)).await;
        cache.add("key", bytes(b"second")).await;

        // The original write would have been swept at t=4.
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(cache.get("key").await, Some(bytes(b"second")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_keeps_fresh_entries() {
        let cache = ResponseCache::new(TimeDelta::seconds(2)).unwrap();
        cache.add("old", bytes(b"old")).await;

        sleep(Duration::from_secs(3)).await;
        cache.add("new", bytes(b"new")).await;

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(cache.get("old").await, None);
        assert_eq!(cache.get("new").await, Some(bytes(b"new")));
    }

    #[test]
    fn test_negative_interval_rejected() {
        // No runtime here: the interval check must come first, before any
        // attempt to spawn the sweeper.
        let result = ResponseCache::new(TimeDelta::milliseconds(-1));
        assert!(matches!(result, Err(CacheError::InvalidInterval(_))));
    }

    #[test]
    fn test_requires_runtime() {
        let result = ResponseCache::new(TimeDelta::seconds(1));
        assert!(matches!(result, Err(CacheError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let cache = ResponseCache::new(TimeDelta::zero()).unwrap();
        assert_eq!(cache.interval(), MIN_SWEEP_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_stops_sweeping() {
        let cache = ResponseCache::new(TimeDelta::seconds(1)).unwrap();
        assert!(!cache.is_closed());

        cache.close().await;
        cache.close().await;
        assert!(cache.is_closed());

        cache.add("key", bytes(b"value")).await;
        sleep(Duration::from_secs(10)).await;

        assert_eq!(cache.get("key").await, Some(bytes(b"value")));
        assert_eq!(cache.stats().await.sweeps, 0);
    }

    #[tokio::test]
    async fn test_stats_count_hits_and_misses() {
        let cache = ResponseCache::new(TimeDelta::seconds(5)).unwrap();

        cache.add("key1", bytes(b"value1")).await;
        cache.get("key1").await;
        cache.get("nonexistent").await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_lose_nothing() {
        let cache = Arc::new(ResponseCache::new(TimeDelta::seconds(60)).unwrap());
        let writers = 64;

        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    let key = format!("key_{}", i);
                    cache.add(key.clone(), Bytes::from(key.clone().into_bytes())).await;
                    // Interleave reads of other writers' keys.
                    cache.get(&format!("key_{}", (i + 1) % writers)).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len().await, writers);
        for i in 0..writers {
            let key = format!("key_{}", i);
            assert_eq!(cache.get(&key).await, Some(Bytes::from(key.clone().into_bytes())));
        }
    }

    #[tokio::test]
    async fn test_generic_payload() {
        let cache: TtlCache<Vec<String>> = TtlCache::new(TimeDelta::seconds(5)).unwrap();

        cache
            .add("names", vec!["pikachu".to_string(), "eevee".to_string()])
            .await;

        let names = cache.get("names").await.unwrap();
        assert_eq!(names, vec!["pikachu", "eevee"]);
    }
}
