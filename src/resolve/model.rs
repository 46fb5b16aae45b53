//! JSON model resolver
//!
//! Paths are dot-separated. Empty segments are skipped, so `.Customer.Name`
//! and `Customer.Name` address the same value. Array elements are selected by
//! decimal index.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;
use serde::Serialize;
use serde_json::Value;

use super::Resolve;

/// Default number of memoized paths
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Resolves paths against a `serde_json::Value`, memoizing rendered lookups
#[derive(Debug)]
pub struct ModelResolver {
    model: Value,
    cache: Mutex<LruCache<String, Option<String>>>,
}

impl ModelResolver {
    pub fn new(model: Value) -> Self {
        Self::with_capacity(model, DEFAULT_CACHE_CAPACITY)
    }

    /// A capacity of zero is treated as one
    pub fn with_capacity(model: Value, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        ModelResolver {
            model,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Build from any serializable value
    pub fn from_serialize<T: Serialize>(data: &T) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::to_value(data)?))
    }

    /// The value at `path`, without rendering
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.model, |value, segment| match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    fn render(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Lock the cache; a poisoned cache only loses memoization
    fn cache(&self) -> MutexGuard<'_, LruCache<String, Option<String>>> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Resolve for ModelResolver {
    /// The lock is held only for the cache probe and the insert, never
    /// while a miss is looked up and rendered
    fn resolve(&self, path: &str) -> Option<String> {
        if let Some(hit) = self.cache().get(path) {
            return hit.clone();
        }

        let rendered = self.lookup(path).map(Self::render);
        self.cache().put(path.to_owned(), rendered.clone());
        rendered
    }
}
