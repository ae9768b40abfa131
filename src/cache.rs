//! Memoization of string parses

use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use crate::{colors::CanonicalColor, error::CanvasColorResult};

/// Point-in-time view of the cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, `0.0` before any lookup
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe map from trimmed input strings to parsed colors.
///
/// Only successful parses are stored, and entries are never evicted: the
/// key space in practice is the handful of colors a document uses.
#[derive(Debug, Default)]
pub struct ColorCache {
    entries: Mutex<HashMap<String, CanonicalColor>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CanonicalColor>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<CanonicalColor> {
        self.lock().get(key).copied()
    }

    /// Return the cached color for `key`, or run `parse` and store its result
    /// if it succeeds.
    pub fn get_or_try_insert_with<F>(
        &self,
        key: &str,
        parse: F,
    ) -> CanvasColorResult<CanonicalColor>
    where
        F: FnOnce() -> CanvasColorResult<CanonicalColor>,
    {
        if let Some(color) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key, "color cache hit");
            return Ok(color);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key, "color cache miss");
        let color = parse()?;
        self.lock().insert(key.to_string(), color);
        Ok(color)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanvasColorError;
    use pretty_assertions::assert_eq;
    use std::{sync::Arc, thread};

    #[test]
    fn test_hit_after_miss() {
        let cache = ColorCache::new();
        let red = CanonicalColor::rgb(255, 0, 0);

        assert_eq!(cache.get_or_try_insert_with("red", || Ok(red)).unwrap(), red);
        let again = cache
            .get_or_try_insert_with("red", || panic!("should be cached"))
            .unwrap();
        assert_eq!(again, red);

        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
        assert_eq!(cache.stats().hit_rate(), 0.5);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ColorCache::new();
        let failing = || Err(CanvasColorError::invalid_format("nope", (0, 4), "unknown"));

        assert!(cache.get_or_try_insert_with("nope", failing).is_err());
        assert!(cache.get_or_try_insert_with("nope", failing).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_clear_resets() {
        let cache = ColorCache::new();
        let _ = cache.get_or_try_insert_with("black", || Ok(CanonicalColor::rgb(0, 0, 0)));
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_concurrent_lookups() {
        let cache = Arc::new(ColorCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let color = cache
                            .get_or_try_insert_with("teal", || Ok(CanonicalColor::rgb(0, 128, 128)))
                            .unwrap();
                        assert_eq!(color, CanonicalColor::rgb(0, 128, 128));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits + stats.misses, 800);
    }
}
