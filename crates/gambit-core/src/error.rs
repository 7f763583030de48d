//! Error types for gambit operations.
//!
//! This module defines [`AgentError`], the error enum used across the engine.
//! Transport-origin failures are recoverable and feed the reconnection
//! supervisor; strategy-origin failures degrade to a skipped command; only
//! reconnect exhaustion is surfaced to the caller as terminal.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using [`AgentError`].
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error type for all gambit engine operations.
#[derive(Debug, Error)]
pub enum AgentError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection attempt did not complete within the configured timeout
    #[error("Connect to {url} timed out after {timeout:?}")]
    ConnectTimeout { url: String, timeout: Duration },

    /// Connection attempt failed outright
    #[error("Connect to {url} failed: {message}")]
    ConnectFailed { url: String, message: String },

    /// Sending a payload on the transport failed
    #[error("Send failed: {message}")]
    SendFailed { message: String },

    /// Receiving from the transport failed
    #[error("Receive failed: {message}")]
    RecvFailed { message: String },

    /// No message arrived within the per-receive timeout
    #[error("Receive timed out after {timeout:?}")]
    RecvTimeout { timeout: Duration },

    /// Reconnect attempts exhausted; the agent will not restart itself
    #[error("Connection lost after {attempts} reconnect attempts")]
    ReconnectExhausted { attempts: u32 },

    // =========================================================================
    // Strategy Errors
    // =========================================================================
    /// The move-generation callback failed for a command
    #[error("Move generation failed for command {command:?}: {message}")]
    MoveGeneration {
        command: Option<String>,
        message: String,
    },

    /// A response payload could not be serialized to wire text
    #[error("Response serialization failed: {message}")]
    ResponseSerialization {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // =========================================================================
    // Setup Errors
    // =========================================================================
    /// Logging initialization failed
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// Log directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AgentError {
    /// Create a ConnectFailed error.
    pub fn connect_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a SendFailed error.
    pub fn send_failed(message: impl Into<String>) -> Self {
        Self::SendFailed {
            message: message.into(),
        }
    }

    /// Create a RecvFailed error.
    pub fn recv_failed(message: impl Into<String>) -> Self {
        Self::RecvFailed {
            message: message.into(),
        }
    }

    /// Create a MoveGeneration error.
    pub fn move_generation(command: Option<&str>, message: impl Into<String>) -> Self {
        Self::MoveGeneration {
            command: command.map(str::to_owned),
            message: message.into(),
        }
    }

    // =========================================================================
    // Error classification helpers
    // =========================================================================

    /// Returns true if this error originated in the transport layer.
    ///
    /// Transport errors are handled by the reconnection supervisor and are
    /// recoverable up to the configured attempt budget.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout { .. }
                | Self::ConnectFailed { .. }
                | Self::SendFailed { .. }
                | Self::RecvFailed { .. }
                | Self::RecvTimeout { .. }
        )
    }

    /// Returns true if this error is terminal for the agent.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ReconnectExhausted { .. })
    }

    /// Returns true if this error came from the strategy rather than the
    /// engine or transport. Strategy errors never stop the receive loop.
    pub fn is_strategy_error(&self) -> bool {
        matches!(
            self,
            Self::MoveGeneration { .. } | Self::ResponseSerialization { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(AgentError::connect_failed("ws://x", "refused").is_transport());
        assert!(
            AgentError::RecvTimeout {
                timeout: Duration::from_secs(2)
            }
            .is_transport()
        );
        assert!(!AgentError::ReconnectExhausted { attempts: 3 }.is_transport());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(AgentError::ReconnectExhausted { attempts: 3 }.is_fatal());
        assert!(!AgentError::send_failed("broken pipe").is_fatal());
    }

    #[test]
    fn test_strategy_classification() {
        let err = AgentError::move_generation(Some("guess"), "model unavailable");
        assert!(err.is_strategy_error());
        assert!(!err.is_transport());
        assert!(err.to_string().contains("guess"));
    }
}
