//! Cache-aside rate service with stale-while-revalidate refresh.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{MemoryRateStore, RateEntry, RateStore};
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::client::ModelClient;
use crate::config::PricingConfig;
use crate::domain::RateKey;
use crate::error::QuoteError;
use crate::http_client::ReqwestHttpClient;

/// Entry point composing the cache, circuit breaker, and model client.
///
/// One long-lived instance is constructed at process start and handed to
/// consumers explicitly. All shared state sits behind `Arc`, so clones are
/// cheap and background refresh tasks can run detached.
///
/// Concurrent readers of one absent or stale key each run their own
/// fetch-and-cache sequence; in-flight fetches are not deduplicated per
/// key, and each consults and updates the breaker independently.
#[derive(Clone)]
pub struct RateService {
    store: Arc<dyn RateStore>,
    client: Arc<ModelClient>,
    breaker: Arc<CircuitBreaker>,
    soft_ttl: Duration,
    cache_ttl: Duration,
}

impl RateService {
    pub fn new(
        store: Arc<dyn RateStore>,
        client: Arc<ModelClient>,
        breaker: Arc<CircuitBreaker>,
        config: &PricingConfig,
    ) -> Self {
        Self {
            store,
            client,
            breaker,
            soft_ttl: config.soft_ttl,
            cache_ttl: config.cache_ttl,
        }
    }

    /// Production wiring: reqwest transport, in-memory store, one breaker.
    pub fn from_config(config: &PricingConfig) -> Self {
        let http = Arc::new(ReqwestHttpClient::new(config.timeout));
        let client = Arc::new(ModelClient::new(
            http,
            config.base_url.clone(),
            config.token.clone(),
            config.timeout,
        ));
        let breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: config.failure_threshold,
            reset_timeout: config.reset_timeout,
        }));
        Self::new(Arc::new(MemoryRateStore::new()), client, breaker, config)
    }

    /// Rate for the given key.
    ///
    /// Fresh cache hits return immediately. Stale hits return the cached
    /// value while a fire-and-forget refresh runs in the background.
    /// Misses fetch synchronously and propagate any failure.
    pub async fn get_rate(&self, key: &RateKey) -> Result<String, QuoteError> {
        let cache_key = key.cache_key();

        if let Some(entry) = self.store.read(&cache_key).await {
            if entry.age() <= self.soft_ttl {
                return Ok(entry.rate);
            }
            debug!(key = %key, "stale rate, scheduling refresh");
            self.spawn_refresh(key.clone());
            return Ok(entry.rate);
        }

        self.fetch_and_cache(key).await
    }

    /// Breaker-gated fetch, cache write, and breaker bookkeeping.
    ///
    /// A rejected admit raises without touching the transport or the
    /// cache. Every failure kind raised by the fetch counts toward the
    /// breaker, not only transport-level ones.
    pub async fn fetch_and_cache(&self, key: &RateKey) -> Result<String, QuoteError> {
        if !self.breaker.allow_request() {
            return Err(QuoteError::circuit_open("circuit open: too many failures"));
        }

        match self.client.fetch_rate(key).await {
            Ok(rate) => {
                self.store
                    .write(key.cache_key(), RateEntry::new(rate.clone()), self.cache_ttl)
                    .await;
                self.breaker.record_success();
                Ok(rate)
            }
            Err(error) => {
                self.breaker.record_failure();
                Err(error)
            }
        }
    }

    /// Refresh outcomes are logged and discarded, never rejoined with any
    /// caller; the task runs to completion on its own.
    fn spawn_refresh(&self, key: RateKey) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(error) = service.fetch_and_cache(&key).await {
                warn!(key = %key, error = %error, code = error.code(), "async rate refresh failed");
            }
        });
    }
}
