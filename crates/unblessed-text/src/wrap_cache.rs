#![forbid(unsafe_code)]

//! LRU cache of laid-out widget content.
//!
//! Wrapping is recomputed on every render of every text widget, yet the
//! inputs rarely change between frames. [`WrapCache`] memoizes
//! [`wrap_content`] results keyed by the content and every option that
//! affects layout.
//!
//! # Example
//! ```
//! use unblessed_text::wrap_cache::{WrapCache, WrapCacheKey};
//!
//! let mut cache = WrapCache::new(100);
//! let key = WrapCacheKey::new("hello world", 5);
//!
//! let lines = cache.get_or_wrap(key.clone()).real.clone();
//! assert_eq!(lines, vec!["hello ", "world"]);
//!
//! cache.get_or_wrap(key);
//! let stats = cache.stats();
//! assert_eq!((stats.hits, stats.misses), (1, 1));
//! ```
//!
//! A process-wide default instance is available through
//! [`with_global_wrap_cache`].

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use crate::config::{DEFAULT_WRAP_CACHE_CAPACITY, WrapCacheConfig};
use crate::content::{Align, ContentOptions, WrapMode, WrappedContent, wrap_content};

/// Everything that affects the layout of one piece of content.
///
/// Two keys are equal exactly when all fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WrapCacheKey {
    pub content: String,
    pub width: usize,
    pub wrap_mode: WrapMode,
    pub full_unicode: bool,
    pub align: Align,
    pub parse_tags: bool,
}

impl WrapCacheKey {
    /// Key for `content` wrapped at `width`, left aligned, without tag parsing.
    #[must_use]
    pub fn new(content: impl Into<String>, width: usize) -> Self {
        Self {
            content: content.into(),
            width,
            wrap_mode: WrapMode::Wrap,
            full_unicode: false,
            align: Align::Left,
            parse_tags: false,
        }
    }

    #[must_use]
    pub fn wrap_mode(mut self, wrap_mode: WrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self
    }

    #[must_use]
    pub fn full_unicode(mut self, full_unicode: bool) -> Self {
        self.full_unicode = full_unicode;
        self
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn parse_tags(mut self, parse_tags: bool) -> Self {
        self.parse_tags = parse_tags;
        self
    }

    /// Layout options equivalent to this key.
    #[must_use]
    pub fn to_content_options(&self) -> ContentOptions {
        ContentOptions::new(self.width)
            .wrap_mode(self.wrap_mode)
            .full_unicode(self.full_unicode)
            .align(self.align)
            .parse_tags(self.parse_tags)
    }
}

/// Snapshot of cache occupancy and effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WrapCacheStats {
    /// Current number of entries.
    pub size: usize,
    /// Maximum number of entries.
    pub capacity: usize,
    /// `size / capacity × 100`.
    pub utilization_percent: f64,
    pub hits: u64,
    pub misses: u64,
}

impl WrapCacheStats {
    /// Hit rate in `0.0..=1.0`.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded LRU map from [`WrapCacheKey`] to [`WrappedContent`].
///
/// # Thread Safety
/// `WrapCache` is not synchronized. Share it across threads behind a mutex,
/// or use the process-wide default instance.
#[derive(Debug)]
pub struct WrapCache {
    cache: LruCache<WrapCacheKey, WrappedContent, FxBuildHasher>,
    hits: u64,
    misses: u64,
}

fn clamp_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

impl WrapCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::with_hasher(clamp_capacity(capacity), FxBuildHasher),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a cache with [`DEFAULT_WRAP_CACHE_CAPACITY`] entries.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_WRAP_CACHE_CAPACITY)
    }

    #[must_use]
    pub fn from_config(config: &WrapCacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Look up `key`, marking it most recently used.
    pub fn get(&mut self, key: &WrapCacheKey) -> Option<&WrappedContent> {
        let found = self.cache.get(key);
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Look up `key` without touching recency or statistics.
    #[must_use]
    pub fn peek(&self, key: &WrapCacheKey) -> Option<&WrappedContent> {
        self.cache.peek(key)
    }

    /// Whether `key` is cached. Does not affect recency.
    #[must_use]
    pub fn has(&self, key: &WrapCacheKey) -> bool {
        self.cache.contains(key)
    }

    /// Insert or overwrite `key`, marking it most recently used.
    ///
    /// Inserting a new key into a full cache evicts exactly one entry, the
    /// least recently used.
    pub fn set(&mut self, key: WrapCacheKey, value: WrappedContent) {
        self.make_room_for(&key);
        self.cache.put(key, value);
    }

    /// Cached layout for `key`, computing it with [`wrap_content`] on a miss.
    pub fn get_or_wrap(&mut self, key: WrapCacheKey) -> &WrappedContent {
        let computed = if self.cache.contains(&key) {
            self.hits += 1;
            None
        } else {
            self.misses += 1;
            self.make_room_for(&key);
            Some(wrap_content(&key.content, &key.to_content_options()))
        };
        self.cache
            .get_or_insert(key, || computed.unwrap_or_default())
    }

    /// Remove `key`. Returns whether it was present.
    pub fn delete(&mut self, key: &WrapCacheKey) -> bool {
        self.cache.pop(key).is_some()
    }

    /// Remove every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Change the capacity.
    ///
    /// Shrinking evicts least recently used entries until the cache fits;
    /// growing never evicts. Zero is treated as one.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = clamp_capacity(capacity);
        let mut evicted = 0usize;
        while self.cache.len() > capacity.get() {
            if self.cache.pop_lru().is_none() {
                break;
            }
            evicted += 1;
        }
        self.cache.resize(capacity);
        debug!(capacity = capacity.get(), evicted, "wrap cache resized");
    }

    #[must_use]
    pub fn stats(&self) -> WrapCacheStats {
        let size = self.cache.len();
        let capacity = self.capacity();
        WrapCacheStats {
            size,
            capacity,
            utilization_percent: size as f64 / capacity as f64 * 100.0,
            hits: self.hits,
            misses: self.misses,
        }
    }

    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    fn make_room_for(&mut self, key: &WrapCacheKey) {
        if self.cache.len() < self.capacity() || self.cache.contains(key) {
            return;
        }
        if self.cache.pop_lru().is_some() {
            trace!(capacity = self.capacity(), "evicted least recently used wrap result");
        }
    }
}

impl Default for WrapCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

static GLOBAL_WRAP_CACHE: Mutex<Option<WrapCache>> = Mutex::new(None);

fn global_slot() -> MutexGuard<'static, Option<WrapCache>> {
    // A panic inside `f` leaves the cache structurally intact.
    GLOBAL_WRAP_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` with the process-wide default cache, creating it on first use.
///
/// The first access sizes the cache from [`WrapCacheConfig::from_env`]. The
/// cache stays locked while `f` runs, so every thread sees the same entries.
///
/// # Deadlocks
/// Calling any of the global cache functions from inside `f` deadlocks.
pub fn with_global_wrap_cache<R>(f: impl FnOnce(&mut WrapCache) -> R) -> R {
    let mut slot = global_slot();
    let cache = slot.get_or_insert_with(|| {
        let config = WrapCacheConfig::from_env();
        debug!(capacity = config.capacity, "creating default wrap cache");
        WrapCache::from_config(&config)
    });
    f(cache)
}

/// Drop the default cache for every thread. The next access creates a fresh one.
pub fn reset_global_wrap_cache() {
    let dropped = global_slot().take();
    if dropped.is_some() {
        debug!("default wrap cache reset");
    }
}

/// Install `cache` as the process-wide default, returning the previous one.
pub fn replace_global_wrap_cache(cache: WrapCache) -> Option<WrapCache> {
    global_slot().replace(cache)
}

/// Whether the default cache has been created.
#[must_use]
pub fn global_wrap_cache_initialized() -> bool {
    global_slot().is_some()
}
