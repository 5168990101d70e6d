use std::path::Path;

use async_trait::async_trait;
use kv::{Bucket, Config, Raw, Store};

use super::Cache;

/// Persistent cache backed by a `kv` store on disk. Entries survive process
/// restarts; eviction is left to the store.
pub struct DiskCache {
    bucket: Bucket<'static, String, Raw>,
}

impl DiskCache {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let store = Store::new(Config::new(path))?;
        let bucket = store.bucket::<String, Raw>(Some("tokens"))?;
        Ok(DiskCache { bucket })
    }
}

#[async_trait]
impl Cache for DiskCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.bucket.get(&key.to_string()) {
            Ok(value) => value.map(|raw| raw.to_vec()),
            Err(_) => None,
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> anyhow::Result<()> {
        self.bucket.set(&key.to_string(), &Raw::from(value.as_slice()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        assert_eq!(cache.get("0xabc").await, None);
        cache.put("0xabc", b"value".to_vec()).await.unwrap();
        assert_eq!(cache.get("0xabc").await, Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_reopen_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cache = DiskCache::open(dir.path()).unwrap();
            cache.put("0xabc", b"value".to_vec()).await.unwrap();
        }

        let cache = DiskCache::open(dir.path()).unwrap();
        assert_eq!(cache.get("0xabc").await, Some(b"value".to_vec()));
    }
}
