//! Customer profile resolver
//!
//! Cache-aside orchestration: look in the cache, and only on a confirmed
//! miss call the partner system, normalize its payload, and write the
//! result back into the cache. The steps are strictly sequential within
//! one call; the partner is never raced speculatively against the cache
//! read. Concurrent calls for the same id are not deduplicated: each one
//! that misses will call the partner and write the cache on its own.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::cache::CustomerCache;
use crate::data::Customer;
use crate::normalizer::normalize;
use crate::partner::{CustomerSource, PartnerError};

/// Errors surfaced by [`Resolver::resolve`].
///
/// Partner failures pass through tagged by kind but otherwise untouched;
/// none of them are retried here. Cache-write failures never surface.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The customer exists neither in the cache nor at the partner
    #[error("no customer found for customerId={0}")]
    NotFound(String),

    /// The partner responded with an unexpected status
    #[error("partner responded with status {status}: {description}")]
    Upstream {
        /// HTTP status code from the partner, unchanged
        status: u16,
        /// Partner's error body, unchanged
        description: String,
    },

    /// The partner could not be reached or its response was unreadable
    #[error("partner call failed: {0}")]
    Transport(#[source] PartnerError),
}

impl From<PartnerError> for ResolveError {
    fn from(err: PartnerError) -> Self {
        match err {
            PartnerError::Upstream { status, description } => {
                ResolveError::Upstream { status, description }
            }
            other => ResolveError::Transport(other),
        }
    }
}

/// Resolves customer profiles, cache first, partner system second.
pub struct Resolver {
    cache: Arc<dyn CustomerCache>,
    partner: Arc<dyn CustomerSource>,
}

impl Resolver {
    /// Creates a resolver over the given collaborators.
    pub fn new(cache: Arc<dyn CustomerCache>, partner: Arc<dyn CustomerSource>) -> Self {
        Self { cache, partner }
    }

    /// Resolves the profile for `customer_id`.
    ///
    /// A cache hit returns immediately without touching the partner. On a
    /// miss the partner payload is fetched, normalized, and written back
    /// into the cache best-effort: a failed write is logged and the
    /// customer is returned regardless.
    pub async fn resolve(&self, customer_id: &str) -> Result<Customer, ResolveError> {
        debug!(customer_id, "resolving customer");

        if let Some(customer) = self.cache.get(customer_id).await {
            return Ok(customer);
        }

        let raw = self
            .partner
            .fetch_customer(customer_id)
            .await?
            .ok_or_else(|| ResolveError::NotFound(customer_id.to_string()))?;

        let customer = normalize(&raw);

        match self.cache.put(&customer).await {
            Ok(()) => debug!(customer_id = %customer.customer_id, "customer saved in cache"),
            Err(err) => {
                error!(customer_id = %customer.customer_id, %err, "could not save customer in cache")
            }
        }

        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::cache::CacheError;
    use crate::partner::RawCustomer;

    fn cached_customer(id: &str) -> Customer {
        Customer {
            customer_id: id.to_string(),
            first_name: Some("Cached".to_string()),
            last_name: None,
            birth_date: None,
            email: None,
            phone_number: None,
            loyalty_program: None,
            rail_passes: vec![],
        }
    }

    /// Cache double that counts calls and can be told to fail writes.
    #[derive(Default)]
    struct RecordingCache {
        value: Option<Customer>,
        fail_puts: bool,
        gets: AtomicUsize,
        puts: AtomicUsize,
    }

    #[async_trait]
    impl CustomerCache for RecordingCache {
        async fn get(&self, _customer_id: &str) -> Option<Customer> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.value.clone()
        }

        async fn put(&self, _customer: &Customer) -> Result<(), CacheError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail_puts {
                Err(CacheError::WriteFailed("store unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    /// Partner double that counts calls and serves a canned outcome.
    struct RecordingPartner {
        outcome: fn() -> Result<Option<RawCustomer>, PartnerError>,
        calls: AtomicUsize,
    }

    impl RecordingPartner {
        fn new(outcome: fn() -> Result<Option<RawCustomer>, PartnerError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CustomerSource for RecordingPartner {
        async fn fetch_customer(
            &self,
            _customer_id: &str,
        ) -> Result<Option<RawCustomer>, PartnerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn found_raw() -> Result<Option<RawCustomer>, PartnerError> {
        Ok(Some(RawCustomer {
            id: "X".to_string(),
            ..RawCustomer::default()
        }))
    }

    #[tokio::test]
    async fn test_cache_hit_returns_cached_value_without_calling_partner() {
        let cache = Arc::new(RecordingCache {
            value: Some(cached_customer("X")),
            ..RecordingCache::default()
        });
        let partner = Arc::new(RecordingPartner::new(found_raw));
        let resolver = Resolver::new(cache.clone(), partner.clone());

        let customer = resolver.resolve("X").await.expect("hit should resolve");

        assert_eq!(customer.first_name.as_deref(), Some("Cached"));
        assert_eq!(partner.calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_miss_calls_partner_once_and_writes_cache_once() {
        let cache = Arc::new(RecordingCache::default());
        let partner = Arc::new(RecordingPartner::new(found_raw));
        let resolver = Resolver::new(cache.clone(), partner.clone());

        let customer = resolver.resolve("X").await.expect("miss should resolve");

        assert_eq!(customer.customer_id, "X");
        assert_eq!(cache.gets.load(Ordering::SeqCst), 1);
        assert_eq!(partner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_cache_write_is_swallowed() {
        let cache = Arc::new(RecordingCache {
            fail_puts: true,
            ..RecordingCache::default()
        });
        let partner = Arc::new(RecordingPartner::new(found_raw));
        let resolver = Resolver::new(cache.clone(), partner.clone());

        let customer = resolver
            .resolve("X")
            .await
            .expect("cache write failure must not fail the resolve");

        assert_eq!(customer.customer_id, "X");
        assert_eq!(cache.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_partner_not_found_maps_to_not_found_error_and_skips_cache_write() {
        let cache = Arc::new(RecordingCache::default());
        let partner = Arc::new(RecordingPartner::new(|| Ok(None)));
        let resolver = Resolver::new(cache.clone(), partner.clone());

        let err = resolver.resolve("ghost").await.expect_err("should not resolve");

        match err {
            ResolveError::NotFound(id) => assert_eq!(id, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_error_passes_through_unchanged() {
        let cache = Arc::new(RecordingCache::default());
        let partner = Arc::new(RecordingPartner::new(|| {
            Err(PartnerError::Upstream {
                status: 500,
                description: "boom".to_string(),
            })
        }));
        let resolver = Resolver::new(cache.clone(), partner.clone());

        let err = resolver.resolve("X").await.expect_err("should not resolve");

        match err {
            ResolveError::Upstream { status, description } => {
                assert_eq!(status, 500);
                assert_eq!(description, "boom");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_decode_failure_surfaces_as_transport_error() {
        let cache = Arc::new(RecordingCache::default());
        let partner = Arc::new(RecordingPartner::new(|| {
            let decode_err = serde_json::from_str::<RawCustomer>("not json").unwrap_err();
            Err(PartnerError::Decode(decode_err))
        }));
        let resolver = Resolver::new(cache, partner);

        let err = resolver.resolve("X").await.expect_err("should not resolve");
        assert!(matches!(err, ResolveError::Transport(_)));
    }
}
