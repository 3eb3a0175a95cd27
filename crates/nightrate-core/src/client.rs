//! Validating, retrying client for the external pricing model.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::domain::{RateKey, RateRecord};
use crate::error::QuoteError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::retry::RetryConfig;
use crate::validate;

/// Client for the model's `POST /pricing` endpoint.
///
/// Handles transport-level retries and timeouts, terminal status
/// classification, and response-contract validation. The credential is
/// attached as a static `token` header on every request.
pub struct ModelClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    token: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl ModelClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
            timeout,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch validated rate records for a batch of attribute sets.
    pub async fn fetch_rates(&self, attributes: &[RateKey]) -> Result<Vec<RateRecord>, QuoteError> {
        let response = self.post_pricing(attributes).await?;

        if response.status == 429 {
            return Err(QuoteError::rate_limited("pricing model rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(QuoteError::model(
                Some(response.status),
                format!("pricing model returned HTTP {}", response.status),
            ));
        }

        let body: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|_| QuoteError::format("response body is not a JSON object"))?;
        validate::validate_response(&body)
    }

    /// Single-key convenience over fetch + validate; returns the first
    /// record's normalized rate.
    pub async fn fetch_rate(&self, key: &RateKey) -> Result<String, QuoteError> {
        let rates = self.fetch_rates(std::slice::from_ref(key)).await?;
        let first = rates
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::format("empty rates array"))?;
        Ok(first.rate)
    }

    /// One POST with bounded retries on transport failures and retryable
    /// statuses. Non-retryable statuses (429 included) are returned to the
    /// caller untouched for classification.
    async fn post_pricing(&self, attributes: &[RateKey]) -> Result<HttpResponse, QuoteError> {
        let body = json!({ "attributes": attributes }).to_string();
        let url = format!("{}/pricing", self.base_url);

        let mut attempt: u32 = 0;
        loop {
            let request = HttpRequest::post(url.as_str())
                .with_header("token", self.token.as_str())
                .with_json_body(body.clone())
                .with_timeout(self.timeout);

            match self.http.execute(request).await {
                Ok(response) => {
                    let retry = self.retry.should_retry_status(response.status)
                        && attempt < self.retry.max_retries;
                    if !retry {
                        return Ok(response);
                    }
                    debug!(status = response.status, attempt, "retrying pricing request");
                }
                Err(error) => {
                    let retry =
                        self.retry.should_retry_error(&error) && attempt < self.retry.max_retries;
                    if !retry {
                        return Err(QuoteError::transport(error.message()));
                    }
                    debug!(error = %error, attempt, "retrying pricing request");
                }
            }

            tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}
