//! Reconnect delay policy.
//!
//! The reconnection supervisor sleeps between attempts according to a
//! [`ReconnectPolicy`]: a base delay, an optional exponential multiplier, a
//! cap, and ±25% jitter to avoid thundering-herd reconnects when many agents
//! share one server.

use rand::Rng;
use std::time::Duration;

/// Delay policy for reconnect attempts.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (caps exponential growth).
    pub max_delay: Duration,
    /// Multiplier applied per attempt (1.0 = fixed delay).
    pub multiplier: f64,
    /// Apply ±25% jitter to each delay.
    pub jitter: bool,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 1.0,
            jitter: true,
        }
    }
}

impl ReconnectPolicy {
    /// Fixed-delay policy, as configured by `GameConfig::reconnect_delay`.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            base_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
            jitter: true,
        }
    }

    /// Exponential policy doubling up to `max_delay`.
    pub fn exponential(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            multiplier: 2.0,
            jitter: true,
        }
    }

    /// Calculate the delay before retry number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        if !self.jitter {
            return Duration::from_secs_f64(capped);
        }

        let jitter_range = capped * 0.25;
        let jittered = if jitter_range > 0.0 {
            let mut rng = rand::rng();
            capped + rng.random_range(-jitter_range..jitter_range)
        } else {
            capped
        };

        Duration::from_secs_f64(jittered.max(0.0).min(self.max_delay.as_secs_f64() * 1.25))
    }
}
