use std::sync::Arc;

use dashmap::DashMap;

use crate::backend::LoggerHandle;

/// Per-type logger handles, created on first use and kept for the facade's
/// lifetime.
#[derive(Default)]
pub struct LoggerCache {
    loggers: DashMap<String, Arc<dyn LoggerHandle>>,
}

impl LoggerCache {
    pub fn new() -> Self {
        Self {
            loggers: DashMap::new(),
        }
    }

    /// Returns the handle for `key`, calling `create` only on a miss.
    ///
    /// Creation runs under the shard lock for `key`, so racing first uses of
    /// the same key produce a single handle.
    pub fn get_or_create<F>(&self, key: &str, create: F) -> Arc<dyn LoggerHandle>
    where
        F: FnOnce(&str) -> Arc<dyn LoggerHandle>,
    {
        if let Some(handle) = self.loggers.get(key) {
            return handle.clone();
        }

        self.loggers
            .entry(key.to_string())
            .or_insert_with(|| create(key))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.loggers.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}
