//! Volatile customer cache
//!
//! Cache-aside collaborator of the resolver: a keyed store of [`Customer`]
//! values with a fixed, deployment-configured TTL. The cache owns entry
//! lifetime; entries expire naturally and are never deleted by the resolver.

pub mod memory;

pub use memory::InMemoryCustomerCache;

use async_trait::async_trait;
use thiserror::Error;

use crate::data::Customer;

/// Errors raised by cache writes.
///
/// Reads cannot fail: a broken or missing entry is just a miss. Write
/// failures are surfaced so the resolver can log them, but they never
/// affect the resolved customer.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The entry could not be stored
    #[error("cache write failed: {0}")]
    WriteFailed(String),
}

/// Keyed, TTL-bound store of resolved customers.
#[async_trait]
pub trait CustomerCache: Send + Sync {
    /// Looks up a customer by id; expired entries are misses.
    async fn get(&self, customer_id: &str) -> Option<Customer>;

    /// Stores a customer under its id with the configured TTL.
    async fn put(&self, customer: &Customer) -> Result<(), CacheError>;
}
