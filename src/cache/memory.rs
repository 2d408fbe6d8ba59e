//! In-process implementation of the customer cache
//!
//! Entries are stamped with an expiry instant on write and evicted lazily
//! when a read finds them expired. Concurrency control is a single
//! `tokio::sync::RwLock`; reads only take the write lock when they need to
//! evict.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CacheError, CustomerCache};
use crate::data::Customer;

#[derive(Debug, Clone)]
struct Entry {
    customer: Customer,
    expires_at: Instant,
}

/// Volatile in-memory customer cache with per-entry TTL.
#[derive(Debug)]
pub struct InMemoryCustomerCache {
    entries: RwLock<HashMap<String, Entry>>,
    time_to_live: Duration,
}

impl InMemoryCustomerCache {
    /// Creates an empty cache whose entries live for `time_to_live`.
    pub fn new(time_to_live: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            time_to_live,
        }
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true when the cache holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerCache for InMemoryCustomerCache {
    async fn get(&self, customer_id: &str) -> Option<Customer> {
        {
            let entries = self.entries.read().await;
            match entries.get(customer_id) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    debug!(customer_id, "cache hit");
                    return Some(entry.customer.clone());
                }
                Some(_) => {}
                None => {
                    debug!(customer_id, "cache miss");
                    return None;
                }
            }
        }

        // Expired: evict under the write lock, re-checking in case a
        // concurrent put refreshed the entry in between.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(customer_id) {
            if entry.expires_at > Instant::now() {
                return Some(entry.customer.clone());
            }
            entries.remove(customer_id);
        }
        debug!(customer_id, "cache miss (expired)");
        None
    }

    async fn put(&self, customer: &Customer) -> Result<(), CacheError> {
        let entry = Entry {
            customer: customer.clone(),
            expires_at: Instant::now() + self.time_to_live,
        };
        let mut entries = self.entries.write().await;
        entries.insert(customer.customer_id.clone(), entry);
        debug!(customer_id = %customer.customer_id, "customer stored in cache");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str) -> Customer {
        Customer {
            customer_id: id.to_string(),
            first_name: Some("Leodagan".to_string()),
            last_name: None,
            birth_date: None,
            email: None,
            phone_number: None,
            loyalty_program: None,
            rail_passes: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_returns_none_for_unknown_id() {
        let cache = InMemoryCustomerCache::new(Duration::from_secs(60));
        assert!(cache.get("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_returns_the_stored_customer() {
        let cache = InMemoryCustomerCache::new(Duration::from_secs(60));
        let stored = customer("leo");

        cache.put(&stored).await.expect("put should succeed");

        let found = cache.get("leo").await.expect("entry should be fresh");
        assert_eq!(found, stored);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss_and_gets_evicted() {
        let cache = InMemoryCustomerCache::new(Duration::from_millis(5));
        cache.put(&customer("short-lived")).await.expect("put should succeed");

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(cache.get("short-lived").await.is_none());
        assert!(cache.is_empty().await, "expired entry should be evicted on read");
    }

    #[tokio::test]
    async fn test_put_overwrites_and_refreshes_the_entry() {
        let cache = InMemoryCustomerCache::new(Duration::from_secs(60));
        let mut first = customer("same-id");
        first.first_name = Some("First".to_string());
        let mut second = customer("same-id");
        second.first_name = Some("Second".to_string());

        cache.put(&first).await.expect("first put should succeed");
        cache.put(&second).await.expect("second put should succeed");

        let found = cache.get("same-id").await.expect("entry should exist");
        assert_eq!(found.first_name.as_deref(), Some("Second"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_entries_are_isolated_by_customer_id() {
        let cache = InMemoryCustomerCache::new(Duration::from_secs(60));
        cache.put(&customer("a")).await.expect("put should succeed");
        cache.put(&customer("b")).await.expect("put should succeed");

        assert_eq!(cache.get("a").await.unwrap().customer_id, "a");
        assert_eq!(cache.get("b").await.unwrap().customer_id, "b");
        assert_eq!(cache.len().await, 2);
    }
}
