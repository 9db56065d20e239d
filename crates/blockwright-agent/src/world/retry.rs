//! Backoff schedule and circuit breaker for world-service calls.

use std::time::{Duration, Instant};

use blockwright_core::config::{BreakerConfig, RetryConfig};

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at `max_delay`.
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    config
        .base_delay
        .saturating_mul(1u32 << exp)
        .min(config.max_delay)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open { until: Instant },
    /// Cooldown elapsed and one probe call is in flight. Other calls are
    /// rejected until its result is recorded, or until another cooldown
    /// passes without one.
    HalfOpen { probe_started: Instant },
}

/// Opens after `failure_threshold` consecutive failed operations and rejects
/// calls until the cooldown elapses. Then a single probe call is admitted: its
/// success closes the breaker, its failure reopens it.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    state: BreakerState,
    consecutive_failures: u32,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            state: BreakerState::Closed,
            consecutive_failures: 0,
        }
    }

    pub fn state(&self) -> BreakerState {
        self.state
    }

    /// `Err(remaining)` while open or while a probe is in flight.
    pub fn admit(&mut self, now: Instant) -> Result<(), Duration> {
        match self.state {
            BreakerState::Closed => Ok(()),
            BreakerState::Open { until } if now < until => Err(until - now),
            BreakerState::HalfOpen { probe_started }
                if now < probe_started + self.config.cooldown =>
            {
                Err(probe_started + self.config.cooldown - now)
            }
            BreakerState::Open { .. } | BreakerState::HalfOpen { .. } => {
                tracing::info!("world circuit half-open, letting a probe through");
                self.state = BreakerState::HalfOpen { probe_started: now };
                Ok(())
            }
        }
    }

    pub fn record_success(&mut self) {
        if self.state != BreakerState::Closed {
            tracing::info!("world circuit closed");
        }
        self.state = BreakerState::Closed;
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self, now: Instant) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let trip = matches!(self.state, BreakerState::HalfOpen { .. })
            || self.consecutive_failures >= self.config.failure_threshold;
        if trip {
            tracing::warn!(
                failures = self.consecutive_failures,
                cooldown_secs = self.config.cooldown.as_secs(),
                "world circuit open"
            );
            self.state = BreakerState::Open {
                until: now + self.config.cooldown,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let cfg = RetryConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_millis(1000),
        };
        let delays: Vec<u128> = (1..=5).map(|a| backoff_delay(&cfg, a).as_millis()).collect();
        assert_eq!(delays, [200, 400, 800, 1000, 1000]);
        assert_eq!(backoff_delay(&cfg, 200).as_millis(), 1000);
    }

    fn breaker(threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(BreakerConfig {
            failure_threshold: threshold,
            cooldown: Duration::from_secs(30),
        })
    }

    #[test]
    fn test_opens_after_threshold() {
        let mut b = breaker(3);
        let t0 = Instant::now();
        b.record_failure(t0);
        b.record_failure(t0);
        assert_eq!(b.state(), BreakerState::Closed);
        b.record_failure(t0);
        assert!(matches!(b.state(), BreakerState::Open { .. }));

        let remaining = b.admit(t0 + Duration::from_secs(10)).unwrap_err();
        assert_eq!(remaining, Duration::from_secs(20));
    }

    #[test]
    fn test_success_resets_count() {
        let mut b = breaker(2);
        let t0 = Instant::now();
        b.record_failure(t0);
        b.record_success();
        b.record_failure(t0);
        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[test]
    fn test_half_open_probe() {
        let mut b = breaker(1);
        let t0 = Instant::now();
        b.record_failure(t0);
        let after = t0 + Duration::from_secs(31);
        assert!(b.admit(after).is_ok());
        assert_eq!(b.state(), BreakerState::HalfOpen { probe_started: after });

        // failed probe reopens
        b.record_failure(after);
        assert!(b.admit(after + Duration::from_secs(1)).is_err());

        // successful probe closes
        let later = after + Duration::from_secs(31);
        assert!(b.admit(later).is_ok());
        b.record_success();
        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[test]
    fn test_half_open_admits_a_single_probe() {
        let mut b = breaker(1);
        let t0 = Instant::now();
        b.record_failure(t0);
        let after = t0 + Duration::from_secs(31);

        assert!(b.admit(after).is_ok());
        let remaining = b.admit(after + Duration::from_secs(1)).unwrap_err();
        assert_eq!(remaining, Duration::from_secs(29));

        // a probe that never reports back does not wedge the breaker
        assert!(b.admit(after + Duration::from_secs(30)).is_ok());
        b.record_success();
        assert!(b.admit(after + Duration::from_secs(31)).is_ok());
        assert!(b.admit(after + Duration::from_secs(31)).is_ok());
    }
}
