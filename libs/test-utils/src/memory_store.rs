use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kv_store::{KeyValueStore, KvError, KvResult};
use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    ttl: Duration,
}

/// In-process [`KeyValueStore`] double.
///
/// Remembers the TTL each entry was written with so tests can assert on
/// TTL class, and supports the `*` glob that slot eviction scans with.
/// Entries never actually expire; expiry is simulated by deleting keys.
/// `fail_reads` / `fail_writes` flip the store into its unavailable
/// failure mode for the respective operations.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// TTL the entry was last written with, `None` if absent.
    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.read().await.get(key).map(|entry| entry.ttl)
    }

    /// Decoded value under `key`, `None` if absent or undecodable.
    pub async fn value_of<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Seed an entry directly, bypassing fault injection.
    pub async fn seed<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        T: serde::Serialize,
    {
        let value = serde_json::to_value(value)
            .expect("seeded test values serialize");
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry { value, ttl });
    }

    /// Drop a key directly, simulating TTL expiry.
    pub async fn expire(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub async fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> =
            self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn len(&self) -> usize { self.entries.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> KvResult<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Other(
                "injected read failure".to_string(),
            ));
        }
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .map(|entry| entry.value.clone()))
    }

    async fn set_with_ttl(
        &self, key: &str, value: &Value, ttl: Duration,
    ) -> KvResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Other(
                "injected write failure".to_string(),
            ));
        }
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self, pattern: &str) -> KvResult<Vec<String>> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Minimal glob over `*` only, the subset Redis `KEYS` usage here needs.
fn glob_match(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let segments: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;
    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            if !key.starts_with(segment) {
                return false;
            }
            pos = segment.len();
        }
        else if i == segments.len() - 1 {
            return key[pos..].ends_with(segment);
        }
        else if let Some(found) = key[pos..].find(segment) {
            pos += found + segment.len();
        }
        else {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matches_prefix_patterns() {
        assert!(glob_match("slots:1:*", "slots:1:1:2024-12-13"));
        assert!(glob_match("slots:1:*", "slots:1:2:2024-12-14"));
        assert!(!glob_match("slots:1:*", "slots:10:1:2024-12-13"));
        assert!(!glob_match("slots:1:*", "courts-1"));
        assert!(glob_match("club-22", "club-22"));
        assert!(!glob_match("club-22", "club-2"));
    }

    #[tokio::test]
    async fn remembers_write_ttl() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(300);

        store
            .set_with_ttl("slots:1:1:2024-12-13", &serde_json::json!([]), ttl)
            .await
            .unwrap();

        assert_eq!(store.ttl_of("slots:1:1:2024-12-13").await, Some(ttl));
    }

    #[tokio::test]
    async fn injected_failures_surface_as_store_errors() {
        let store = MemoryStore::new();
        store.fail_reads(true);

        assert!(store.get("anything").await.is_err());

        store.fail_reads(false);
        assert!(store.get("anything").await.unwrap().is_none());
    }
}
