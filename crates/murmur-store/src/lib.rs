pub mod cache;
pub mod config;
pub mod generator;
pub mod mutation;
pub mod page;
pub mod pagination;

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use uuid::Uuid;

pub use cache::{CacheEntry, CacheKey, CacheStore, Dataset, Record};
pub use config::StoreConfig;
pub use page::{BackwardCursor, ForwardCursor, MessagePage, Page, PreviewPage};

/// Session-scoped owner of every cached dataset.
///
/// One instance per application session (or per test). The pagination and
/// mutation engines are implemented as methods on this type so that both
/// always see the same entries.
pub struct Store {
    cache: Mutex<CacheStore>,
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        info!(
            max_page_size = config.max_page_size,
            oversize_factor = config.oversize_factor,
            seeded = config.seed.is_some(),
            "Store created"
        );
        Self {
            cache: Mutex::new(CacheStore::default()),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the cache.
    ///
    /// Every store operation finishes its mutation before returning, so a
    /// poisoned lock still guards a consistent map and is recovered.
    pub fn with_cache<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut CacheStore) -> T,
    {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cache)
    }

    /// Wipe every entry. Used for demo resets.
    pub fn clear(&self) {
        let dropped = self.with_cache(|cache| cache.clear());
        info!(entries = dropped, "Cache cleared");
    }

    /// Number of materialised entries.
    pub fn len(&self) -> usize {
        self.with_cache(|cache| cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generation tag of the entry under `key`, if it has been materialised.
    pub fn generation_of(&self, key: &CacheKey) -> Option<Uuid> {
        self.with_cache(|cache| cache.get(key).map(|entry| entry.generation))
    }

    /// Length of the backing sequence under `key`, if materialised.
    pub fn entry_len(&self, key: &CacheKey) -> Option<usize> {
        self.with_cache(|cache| cache.get(key).map(|entry| entry.dataset.len()))
    }

    /// RNG used to generate the dataset for `key`.
    fn rng_for(&self, key: &CacheKey) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ key_hash(key)),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

/// FNV-1a over the rendered key. Stable across runs, unlike `DefaultHasher`.
fn key_hash(key: &CacheKey) -> u64 {
    key.to_string()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}
