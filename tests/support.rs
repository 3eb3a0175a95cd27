//! Shared test doubles for the behavior tests.

// Each test target compiles its own copy and uses a subset.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nightrate_core::{
    CircuitBreaker, CircuitBreakerConfig, HttpClient, HttpError, HttpRequest, HttpResponse,
    MemoryRateStore, ModelClient, PricingConfig, RateService, RetryConfig,
};

/// Transport double that replays a scripted sequence of outcomes and
/// records every request it saw.
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(script: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(status: u16, body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse {
            status,
            body: body.to_string(),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("request log lock").len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("request log lock").push(request);
        let outcome = self
            .script
            .lock()
            .expect("script lock")
            .pop_front()
            .expect("script exhausted");
        Box::pin(async move { outcome })
    }
}

/// A model response carrying one rate for the scenario key.
pub fn rates_body(rate: &str) -> String {
    format!(
        r#"{{"rates":[{{"period":"Summer","hotel":"GitawayHotel","room":"SingletonRoom","rate":"{rate}"}}]}}"#
    )
}

/// Service wired against a scripted transport, with handles on every
/// collaborator the tests observe.
pub struct Harness {
    pub service: RateService,
    pub http: Arc<ScriptedHttpClient>,
    pub store: MemoryRateStore,
    pub breaker: Arc<CircuitBreaker>,
}

impl Harness {
    /// Retries are disabled so every fetch-and-cache sequence is exactly
    /// one transport call; wire-level retry behavior is covered by the
    /// transport tests.
    pub fn new(script: Vec<Result<HttpResponse, HttpError>>, config: &PricingConfig) -> Self {
        let http = ScriptedHttpClient::new(script);
        let store = MemoryRateStore::new();
        let breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: config.failure_threshold,
            reset_timeout: config.reset_timeout,
        }));

        let client = Arc::new(
            ModelClient::new(
                Arc::clone(&http) as Arc<dyn HttpClient>,
                "http://model.test",
                config.token.clone(),
                config.timeout,
            )
            .with_retry(RetryConfig::no_retry()),
        );

        let service = RateService::new(
            Arc::new(store.clone()),
            client,
            Arc::clone(&breaker),
            config,
        );

        Self {
            service,
            http,
            store,
            breaker,
        }
    }

    /// Wait until the scripted transport has seen `count` requests; panics
    /// after two seconds so a missing background task fails loudly.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.http.request_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {count} transport requests, saw {}",
            self.http.request_count()
        );
    }
}
