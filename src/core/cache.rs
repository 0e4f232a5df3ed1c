//! Key/value cache abstraction with per-entry expiry

use async_trait::async_trait;
use std::time::Duration;

/// A key/value store whose entries may carry a time-to-live.
///
/// Expired entries behave as if they were never stored.
#[async_trait]
pub trait Cache<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Send + Sync,
{
    async fn get(&self, key: &K) -> Option<V>;

    async fn put(&self, key: K, value: V, ttl: Option<Duration>);

    async fn remove(&self, key: &K);
}
