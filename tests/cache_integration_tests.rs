//! Integration Tests for the cache crate
//!
//! Exercises caches built through the provider, shared across threads.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use gencache::{Cache, CacheConfig, CacheProvider, LruCache, LruCacheProvider};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn named_cache(size: usize, name: &str) -> Arc<dyn Cache<String, u64>> {
    LruCacheProvider::new()
        .new_cache_with_params(CacheConfig {
            size,
            name: name.to_string(),
            default_expiry_secs: 0,
            invalidate_cluster_event: format!("inv_{name}"),
        })
        .unwrap()
}

// == Concurrency ==

#[test]
fn test_get_or_add_race_stores_exactly_one_value() {
    init_tracing();
    const THREADS: usize = 16;

    for _ in 0..20 {
        let cache = named_cache(64, "race");
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS as u64)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_or_add("shared".to_string(), i, Duration::from_secs(60))
                })
            })
            .collect();

        let results: Vec<(u64, bool)> = handles
            .into_iter()
            .map(|handle| handle.join().expect("Thread should not panic"))
            .collect();

        let stored: Vec<u64> = results
            .iter()
            .filter(|(_, loaded)| !loaded)
            .map(|(value, _)| *value)
            .collect();
        assert_eq!(stored.len(), 1, "Exactly one caller should store its value");

        let winner = stored[0];
        assert!(
            results.iter().all(|(value, _)| *value == winner),
            "Every caller should see the stored value: {:?}",
            results
        );
        assert_eq!(cache.get(&"shared".to_string()), Some(winner));
        assert_eq!(cache.len(), 1);
    }
}

#[test]
fn test_concurrent_mixed_operations_stay_within_capacity() {
    init_tracing();
    const THREADS: u64 = 8;
    const CAPACITY: usize = 32;

    let cache: Arc<LruCache<u64, u64>> = Arc::new(LruCache::new(CAPACITY).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS as usize));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..2_000u64 {
                    let key = (t * 7 + i) % 100;
                    match i % 10 {
                        0 => cache.remove(&key),
                        1 if t == 0 && i % 500 == 1 => cache.purge(),
                        2 | 3 => {
                            cache.get_or_add(key, key * 10, Duration::ZERO);
                        }
                        4..=6 => {
                            if let Some(value) = cache.get(&key) {
                                // Values are only ever written as key * 10
                                assert_eq!(value, key * 10);
                            }
                        }
                        _ => cache.add(key, key * 10),
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let stats = cache.stats();
    assert!(stats.physical_entries <= CAPACITY);
    assert!(stats.live_entries <= stats.physical_entries);

    let keys = cache.keys();
    let unique: HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len());
    assert_eq!(keys.len(), cache.len());
}

#[test]
fn test_purge_visible_to_all_threads() {
    let cache = named_cache(100, "sessions");
    for i in 0..50 {
        cache.add(format!("session_{i}"), i);
    }

    cache.purge();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || (0..50).all(|i| cache.get(&format!("session_{i}")).is_none()))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert!(cache.is_empty());
}

// == TTL ==

#[test]
fn test_ttl_expiry_through_provider() {
    let cache = named_cache(10, "config");

    cache.add_with_expires_in_secs("fragment".to_string(), 1, 1);
    assert_eq!(cache.get(&"fragment".to_string()), Some(1));
    assert_eq!(cache.len(), 1);

    thread::sleep(Duration::from_millis(1100));

    assert_eq!(cache.get(&"fragment".to_string()), None);
    assert_eq!(cache.len(), 0);
}

// == Provider ==

#[test]
fn test_provider_from_env_config() {
    init_tracing();
    std::env::set_var("AGGREGATES_CACHE_SIZE", "2");
    std::env::set_var("AGGREGATES_CACHE_INVALIDATE_EVENT", "inv_aggregates");

    let provider = LruCacheProvider::new();
    let cache = provider
        .new_cache_with_params::<String, u64>(CacheConfig::from_env("aggregates"))
        .unwrap();

    assert_eq!(cache.name(), "aggregates");
    assert_eq!(cache.invalidate_cluster_event(), "inv_aggregates");

    cache.add("a".to_string(), 1);
    cache.add("b".to_string(), 2);
    cache.add("c".to_string(), 3);
    assert_eq!(cache.keys(), vec!["b".to_string(), "c".to_string()]);

    provider.close();
}

#[test]
fn test_cluster_event_correlates_with_purge() {
    let caches = [named_cache(10, "users"), named_cache(10, "teams")];
    for cache in &caches {
        cache.add("k".to_string(), 1);
    }

    // An external messaging layer maps a received event to the matching cache
    let event = "inv_teams";
    for cache in caches.iter().filter(|c| c.invalidate_cluster_event() == event) {
        cache.purge();
    }

    assert_eq!(caches[0].get(&"k".to_string()), Some(1));
    assert_eq!(caches[1].get(&"k".to_string()), None);
}
