use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Observable circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
}

/// Breaker thresholds and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures required to open the circuit.
    pub failure_threshold: u32,
    /// How long fetch attempts are rejected after the circuit opens.
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Default)]
struct CircuitInner {
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Thread-safe failure-counting gate for the model fetch path.
///
/// Two states only. Once the reset window elapses past `opened_at` the
/// breaker resets fully and traffic resumes at full rate before any
/// success is observed; there is no single-probe half-open state.
///
/// Each method is internally atomic under one lock, but the sequence
/// admit → fetch → record is not one transaction: concurrent fetches may
/// interleave their bookkeeping.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<CircuitInner>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(CircuitInner::default()),
        }
    }

    /// Whether a fetch attempt may proceed.
    ///
    /// An open circuit past its reset window resets to closed (failure
    /// count zeroed, open timestamp cleared) and admits the request.
    pub fn allow_request(&self) -> bool {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        match inner.opened_at {
            None => true,
            Some(opened_at) => {
                if opened_at.elapsed() > self.config.reset_timeout {
                    inner.consecutive_failures = 0;
                    inner.opened_at = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    /// Count one failure; arm the open timestamp exactly once when the
    /// count first reaches the threshold.
    pub fn record_failure(&self) {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);

        if inner.consecutive_failures >= self.config.failure_threshold && inner.opened_at.is_none()
        {
            inner.opened_at = Some(Instant::now());
        }
    }

    pub fn state(&self) -> CircuitState {
        let inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        if inner.opened_at.is_some() {
            CircuitState::Open
        } else {
            CircuitState::Closed
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        let inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_closed_below_threshold() {
        let breaker = CircuitBreaker::default();

        for _ in 0..4 {
            breaker.record_failure();
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.consecutive_failures(), 4);
        assert!(breaker.allow_request());
    }

    #[test]
    fn opens_at_threshold_and_rejects_within_window() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(10),
        });

        for _ in 0..5 {
            breaker.record_failure();
        }
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.allow_request());
        // A rejected admit does not touch the counters.
        assert_eq!(breaker.consecutive_failures(), 5);
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn resets_fully_once_the_window_elapses() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            reset_timeout: Duration::from_millis(20),
        });

        breaker.record_failure();
        assert!(!breaker.allow_request());

        std::thread::sleep(Duration::from_millis(30));
        assert!(breaker.allow_request());
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.consecutive_failures(), 0);
    }

    #[test]
    fn success_clears_count_and_open_state() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            reset_timeout: Duration::from_secs(10),
        });

        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.consecutive_failures(), 0);
        assert!(breaker.allow_request());
    }

    #[test]
    fn open_timestamp_is_not_rearmed_by_later_failures() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            reset_timeout: Duration::from_millis(50),
        });

        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(30));
        // Still within the window; this failure must not restart it.
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(30));

        // 60ms past the first failure, 30ms past the second: the window is
        // measured from the first arm, so the request is admitted.
        assert!(breaker.allow_request());
        assert_eq!(breaker.consecutive_failures(), 0);
    }
}
