use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

mod disk;
pub use disk::DiskCache;

/// Minimal key/value capability the resolver is written against. Backend
/// read errors collapse to `None`; writes report failure and the caller
/// decides whether that matters.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    async fn put(&self, key: &str, value: Vec<u8>) -> anyhow::Result<()>;
}

/// Bounded in-process cache. The capacity is a hint: when full, an arbitrary
/// resident entry makes room for the new one.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    capacity: usize,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        MemoryCache {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("cache mutex poisoned"))?;
        if entries.len() >= self.capacity && !entries.contains_key(key) {
            if let Some(evicted) = entries.keys().next().cloned() {
                entries.remove(&evicted);
            }
        }
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_what_was_put() {
        let cache = MemoryCache::new(4);
        assert_eq!(cache.get("0xabc").await, None);

        cache.put("0xabc", b"value".to_vec()).await.unwrap();
        assert_eq!(cache.get("0xabc").await, Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_key() {
        let cache = MemoryCache::new(4);
        cache.put("0xabc", b"old".to_vec()).await.unwrap();
        cache.put("0xabc", b"new".to_vec()).await.unwrap();
        assert_eq!(cache.get("0xabc").await, Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let cache = MemoryCache::new(2);
        cache.put("a", vec![1]).await.unwrap();
        cache.put("b", vec![2]).await.unwrap();
        cache.put("c", vec![3]).await.unwrap();

        let resident = cache.entries.lock().unwrap().len();
        assert_eq!(resident, 2);
        assert_eq!(cache.get("c").await, Some(vec![3]));
    }
}
