use crate::core::cache::Cache;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<SystemTime>,
}

/// Cache persisted in a fjall partition, so entries survive between runs.
pub struct DiskCache<K, V>
where
    K: Send + Sync + Serialize + Debug + 'static,
    V: Send + Sync + Serialize + DeserializeOwned + 'static,
{
    keyspace: Keyspace,
    partition: PartitionHandle,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> DiskCache<K, V>
where
    K: Send + Sync + Serialize + Debug,
    V: Send + Sync + Serialize + DeserializeOwned,
{
    pub fn open(db_path: &Path, name: &str) -> Result<Self> {
        std::fs::create_dir_all(db_path)?;

        let keyspace = Config::new(db_path).open()?;
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace,
            partition,
            _marker: PhantomData,
        })
    }

    fn read(&self, key: &K) -> Result<Option<V>> {
        let raw_key = serde_json::to_vec(key)?;
        let Some(raw) = self.partition.get(&raw_key)? else {
            debug!("Cache MISS for key: {:?}", key);
            return Ok(None);
        };

        let entry: CacheEntry<V> = serde_json::from_slice(&raw)?;
        if entry
            .expires_at
            .is_some_and(|expires_at| SystemTime::now() >= expires_at)
        {
            debug!("Cache entry expired for key: {:?}", key);
            self.partition.remove(raw_key)?;
            return Ok(None);
        }
        debug!("Cache HIT for key: {:?}", key);
        Ok(Some(entry.value))
    }

    fn write(&self, key: &K, value: V, ttl: Option<Duration>) -> Result<()> {
        let expires_at = ttl.map(|d| SystemTime::now() + d);
        let entry = CacheEntry { value, expires_at };
        self.partition
            .insert(serde_json::to_vec(key)?, serde_json::to_vec(&entry)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Cache PUT for key: {:?}", key);
        Ok(())
    }

    fn delete(&self, key: &K) -> Result<()> {
        self.partition.remove(serde_json::to_vec(key)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Cache REMOVE for key: {:?}", key);
        Ok(())
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for DiskCache<K, V>
where
    K: Send + Sync + Serialize + Debug + 'static,
    V: Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        // Unreadable entries are treated as misses.
        self.read(key).unwrap_or_else(|e| {
            debug!("DiskCache get error: {}", e);
            None
        })
    }

    async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        if let Err(e) = self.write(&key, value, ttl) {
            debug!("DiskCache put error: {}", e);
        }
    }

    async fn remove(&self, key: &K) {
        if let Err(e) = self.delete(key) {
            debug!("DiskCache remove error: {}", e);
        }
    }
}
