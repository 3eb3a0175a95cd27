//! # nightrate-core
//!
//! Resilient, low-latency access to an external room-rate pricing model.
//!
//! The external model is slow and occasionally unreliable: timeouts, 5xx
//! responses, rate limiting, malformed payloads. This crate shields
//! callers from that while bounding the load placed on the model:
//!
//! - a **stale-while-revalidate cache** over an injected store: fresh hits
//!   return immediately, stale hits return the cached rate while a
//!   background refresh runs, misses fetch synchronously
//! - a **circuit breaker** guarding the refresh path: after enough
//!   consecutive failures, fetches are rejected locally until a reset
//!   window elapses
//! - a **validating, retrying transport client** enforcing a strict
//!   contract on the model's responses
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Rate store capability and in-memory implementation |
//! | [`circuit_breaker`] | Failure-counting gate for the fetch path |
//! | [`client`] | Validating, retrying model client |
//! | [`config`] | Process configuration |
//! | [`domain`] | Rate keys and validated records |
//! | [`error`] | Closed fetch-path error taxonomy |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retry`] | Backoff and retry policy |
//! | [`service`] | Cache-aside orchestrator |
//! | [`validate`] | Response-contract enforcement |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use nightrate_core::{PricingConfig, RateKey, RateService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PricingConfig::from_env()?;
//!     let service = RateService::from_config(&config);
//!
//!     let key = RateKey::new("Summer", "GitawayHotel", "SingletonRoom");
//!     let rate = service.get_rate(&key).await?;
//!     println!("nightly rate: {rate}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! Every fetch-path failure is one of five [`QuoteError`] variants. The
//! request surface matches the kind exhaustively when mapping failures to
//! wire statuses:
//!
//! ```rust
//! use nightrate_core::{QuoteError, QuoteErrorKind};
//!
//! fn wire_status(error: &QuoteError) -> u16 {
//!     match error.kind() {
//!         QuoteErrorKind::Transport | QuoteErrorKind::CircuitOpen => 503,
//!         QuoteErrorKind::Model | QuoteErrorKind::Format => 502,
//!         QuoteErrorKind::RateLimited => 429,
//!     }
//! }
//! ```

pub mod cache;
pub mod circuit_breaker;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod retry;
pub mod service;
pub mod validate;

pub use cache::{MemoryRateStore, RateEntry, RateStore};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use client::ModelClient;
pub use config::{ConfigError, PricingConfig};
pub use domain::{RateKey, RateRecord};
pub use error::{QuoteError, QuoteErrorKind};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use retry::{Backoff, RetryConfig};
pub use service::RateService;
