// src/flash/store.rs
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const FLASH_TTL_MINUTES: i64 = 10;

/// Key-value access as seen by the reconciler. Implemented by the
/// plain in-memory bag so the one-shot logic is testable without the
/// shared store behind it.
pub trait SignalStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str) -> Option<String>;
}

/// The signals accumulated for one flow between two page loads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlashBag {
    values: HashMap<String, String>,
}

impl FlashBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SignalStore for FlashBag {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

struct Entry {
    bag: FlashBag,
    expires_at: DateTime<Utc>,
}

// In-memory flash store keyed by the flow cookie (in production behind
// a single instance this is sufficient; a shared deployment would move
// it to Redis).
#[derive(Clone)]
pub struct FlashStore {
    flows: Arc<RwLock<HashMap<String, Entry>>>,
}

impl FlashStore {
    pub fn new() -> Self {
        Self {
            flows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores one signal for a flow, refreshing the flow's TTL.
    pub async fn put(&self, flow_id: &str, key: &str, value: String) {
        let mut flows = self.flows.write().await;
        let entry = flows.entry(flow_id.to_string()).or_insert_with(|| Entry {
            bag: FlashBag::new(),
            expires_at: Utc::now(),
        });
        entry.bag.set(key, value);
        entry.expires_at = Utc::now() + Duration::minutes(FLASH_TTL_MINUTES);
    }

    /// Removes and returns the flow's bag. Expired or missing flows
    /// yield an empty bag.
    pub async fn take(&self, flow_id: &str) -> FlashBag {
        let mut flows = self.flows.write().await;
        match flows.remove(flow_id) {
            Some(entry) if entry.expires_at > Utc::now() => entry.bag,
            _ => FlashBag::new(),
        }
    }

    /// Puts back whatever the reconciler did not consume.
    pub async fn restore(&self, flow_id: &str, bag: FlashBag) {
        if bag.is_empty() {
            return;
        }
        let mut flows = self.flows.write().await;
        flows.insert(
            flow_id.to_string(),
            Entry {
                bag,
                expires_at: Utc::now() + Duration::minutes(FLASH_TTL_MINUTES),
            },
        );
    }

    /// Drops expired flows; called from a background task.
    pub async fn cleanup_expired(&self) {
        let now = Utc::now();
        self.flows.write().await.retain(|_, entry| entry.expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_take_is_one_shot() {
        let store = FlashStore::new();
        store.put("flow1", "keycloak_message", "{}".to_string()).await;

        let bag = store.take("flow1").await;
        assert_eq!(bag.get("keycloak_message").as_deref(), Some("{}"));

        // Taken means gone.
        let again = store.take("flow1").await;
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn test_flows_are_isolated() {
        let store = FlashStore::new();
        store.put("flow1", "keycloak_error", "a".to_string()).await;

        assert!(store.take("flow2").await.is_empty());
        assert!(!store.take("flow1").await.is_empty());
    }

    #[tokio::test]
    async fn test_restore_round_trip() {
        let store = FlashStore::new();
        let mut bag = FlashBag::new();
        bag.set("keycloak_error", "x".to_string());
        store.restore("flow1", bag).await;

        let taken = store.take("flow1").await;
        assert_eq!(taken.get("keycloak_error").as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_expired_flow_yields_empty_bag() {
        let store = FlashStore::new();
        {
            let mut flows = store.flows.write().await;
            let mut bag = FlashBag::new();
            bag.set("keycloak_message", "stale".to_string());
            flows.insert(
                "flow1".to_string(),
                Entry {
                    bag,
                    expires_at: Utc::now() - Duration::minutes(1),
                },
            );
        }
        assert!(store.take("flow1").await.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = FlashStore::new();
        store.put("live", "k", "v".to_string()).await;
        {
            let mut flows = store.flows.write().await;
            flows.insert(
                "stale".to_string(),
                Entry {
                    bag: FlashBag::new(),
                    expires_at: Utc::now() - Duration::minutes(1),
                },
            );
        }

        store.cleanup_expired().await;

        let flows = store.flows.read().await;
        assert!(flows.contains_key("live"));
        assert!(!flows.contains_key("stale"));
    }
}
