//! Agent connection configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default per-receive timeout in seconds.
pub const DEFAULT_RECV_TIMEOUT_SECS: u64 = 2;

/// Default maximum reconnect attempts.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Default delay between reconnect attempts in seconds.
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 5;

/// Configuration for a game connection.
///
/// Immutable once the agent is constructed; build it up front with the
/// `with_*` methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game server URL (e.g. `ws://localhost:2025`)
    pub url: String,

    /// Maximum time to wait for the connection to open
    pub connect_timeout: Duration,

    /// Maximum time to wait for a single inbound message
    pub recv_timeout: Duration,

    /// Keep the connection open across successive games
    pub keep_alive: bool,

    /// Maximum consecutive reconnect attempts before giving up
    pub max_reconnect_attempts: u32,

    /// Base delay between reconnect attempts
    pub reconnect_delay: Duration,
}

impl GameConfig {
    /// Create a configuration for the given server URL with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            recv_timeout: Duration::from_secs(DEFAULT_RECV_TIMEOUT_SECS),
            keep_alive: true,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_delay: Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS),
        }
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the per-receive timeout.
    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// Enable or disable keep-alive across games.
    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Set the reconnect attempt budget.
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Set the base delay between reconnect attempts.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new("ws://localhost:2025");
        assert_eq!(config.url, "ws://localhost:2025");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.recv_timeout, Duration::from_secs(2));
        assert!(config.keep_alive);
        assert_eq!(config.max_reconnect_attempts, 3);
    }

    #[test]
    fn test_builder_chain() {
        let config = GameConfig::new("ws://example.test")
            .with_connect_timeout(Duration::from_secs(30))
            .with_keep_alive(false)
            .with_max_reconnect_attempts(7)
            .with_reconnect_delay(Duration::from_millis(250));
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert!(!config.keep_alive);
        assert_eq!(config.max_reconnect_attempts, 7);
        assert_eq!(config.reconnect_delay, Duration::from_millis(250));
    }
}
