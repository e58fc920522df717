//! Bounded cache of converted notebook bodies.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of converted notebooks kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// In-memory cache mapping a notebook path to its markup body.
///
/// Entries are evicted least-recently-used first once `capacity` is
/// reached. A capacity of zero disables caching. Cloning shares the
/// underlying storage.
#[derive(Clone, Debug)]
pub struct NotebookCache {
    capacity: usize,
    entries: Arc<Mutex<CacheEntries>>,
}

#[derive(Debug, Default)]
struct CacheEntries {
    bodies: HashMap<PathBuf, Arc<str>>,
    /// Least recently used at the front.
    order: VecDeque<PathBuf>,
}

impl NotebookCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Arc::new(Mutex::new(CacheEntries::default())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().bodies.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        self.lock().get(path)
    }

    pub fn insert(&self, path: PathBuf, body: Arc<str>) {
        let capacity = self.capacity;
        self.lock().insert(path, body, capacity);
    }

    fn lock(&self) -> MutexGuard<'_, CacheEntries> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for NotebookCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl CacheEntries {
    fn get(&mut self, path: &Path) -> Option<Arc<str>> {
        let body = self.bodies.get(path)?.clone();
        self.touch(path);
        Some(body)
    }

    fn insert(&mut self, path: PathBuf, body: Arc<str>, capacity: usize) {
        if capacity == 0 {
            return;
        }

        if self.bodies.insert(path.clone(), body).is_some() {
            self.touch(&path);
            return;
        }
        self.order.push_back(path);

        while self.bodies.len() > capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.bodies.remove(&oldest);
            tracing::debug!("Evicted cached notebook {}", oldest.display());
        }
    }

    fn touch(&mut self, path: &Path) {
        if let Some(pos) = self.order.iter().position(|p| p == path) {
            if let Some(entry) = self.order.remove(pos) {
                self.order.push_back(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> Arc<str> {
        Arc::from(text)
    }

    #[test]
    fn stores_and_returns_bodies() {
        let cache = NotebookCache::new(4);
        cache.insert(PathBuf::from("a.ipynb"), body("A"));

        assert_eq!(cache.get(Path::new("a.ipynb")).as_deref(), Some("A"));
        assert!(cache.get(Path::new("b.ipynb")).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used_at_capacity() {
        let cache = NotebookCache::new(2);
        cache.insert(PathBuf::from("a"), body("A"));
        cache.insert(PathBuf::from("b"), body("B"));

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get(Path::new("a")).is_some());
        cache.insert(PathBuf::from("c"), body("C"));

        assert!(cache.contains(Path::new("a")));
        assert!(!cache.contains(Path::new("b")));
        assert!(cache.contains(Path::new("c")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn reinserting_replaces_without_growing() {
        let cache = NotebookCache::new(2);
        cache.insert(PathBuf::from("a"), body("old"));
        cache.insert(PathBuf::from("a"), body("new"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(Path::new("a")).as_deref(), Some("new"));
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = NotebookCache::new(0);
        cache.insert(PathBuf::from("a"), body("A"));
        assert!(cache.is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let cache = NotebookCache::new(2);
        let other = cache.clone();
        other.insert(PathBuf::from("a"), body("A"));

        assert!(cache.contains(Path::new("a")));
        assert_eq!(cache.len(), other.len());
    }
}
