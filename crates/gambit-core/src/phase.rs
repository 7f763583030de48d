//! Agent lifecycle phases.
//!
//! [`AgentPhase`] is owned exclusively by the lifecycle engine; every inbound
//! event is mapped to at most one transition, and the engine processes events
//! one at a time so transitions are atomic with respect to the receive loop.

use serde::{Deserialize, Serialize};

/// Current lifecycle phase of a game agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// Agent constructed, not yet started
    #[default]
    Idle,
    /// Connection attempt in progress
    Connecting,
    /// Connected, waiting for a game to start
    Connected,
    /// A game is in progress
    Playing,
    /// A game just finished; next phase depends on keep-alive
    GameOver,
    /// Connection closed; the agent will not restart itself
    Disconnected,
    /// Transport fault detected; the reconnection supervisor decides next
    Errored,
}

impl AgentPhase {
    /// Returns true if the agent holds an open connection in this phase.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected | Self::Playing | Self::GameOver)
    }

    /// Returns true if no further transitions will happen without a restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    /// Returns true if a transition from this phase to `next` is part of the
    /// lifecycle state machine.
    pub fn can_transition_to(&self, next: AgentPhase) -> bool {
        use AgentPhase::*;
        matches!(
            (self, next),
            (Idle, Connecting)
                | (Idle, Disconnected)
                | (Connecting, Connected)
                | (Connecting, Errored)
                | (Connected, Playing)
                | (Connected, GameOver)
                | (Connected, Errored)
                | (Connected, Disconnected)
                | (Playing, Playing)
                | (Playing, GameOver)
                | (Playing, Errored)
                | (Playing, Disconnected)
                | (GameOver, Connected)
                | (GameOver, Disconnected)
                | (GameOver, Errored)
                | (Errored, Connecting)
                | (Errored, Disconnected)
        )
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Playing => write!(f, "playing"),
            Self::GameOver => write!(f, "game_over"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phase_is_idle() {
        assert_eq!(AgentPhase::default(), AgentPhase::Idle);
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(AgentPhase::Idle.can_transition_to(AgentPhase::Connecting));
        assert!(AgentPhase::Connecting.can_transition_to(AgentPhase::Connected));
        assert!(AgentPhase::Connected.can_transition_to(AgentPhase::Playing));
        assert!(AgentPhase::Playing.can_transition_to(AgentPhase::GameOver));
        assert!(AgentPhase::GameOver.can_transition_to(AgentPhase::Connected));
        assert!(AgentPhase::GameOver.can_transition_to(AgentPhase::Disconnected));
    }

    #[test]
    fn test_error_path_transitions() {
        assert!(AgentPhase::Playing.can_transition_to(AgentPhase::Errored));
        assert!(AgentPhase::Errored.can_transition_to(AgentPhase::Connecting));
        assert!(AgentPhase::Errored.can_transition_to(AgentPhase::Disconnected));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!AgentPhase::Idle.can_transition_to(AgentPhase::Playing));
        assert!(!AgentPhase::Disconnected.can_transition_to(AgentPhase::Connecting));
        assert!(!AgentPhase::GameOver.can_transition_to(AgentPhase::Playing));
    }

    #[test]
    fn test_connected_predicate() {
        assert!(AgentPhase::Playing.is_connected());
        assert!(AgentPhase::GameOver.is_connected());
        assert!(!AgentPhase::Idle.is_connected());
        assert!(!AgentPhase::Errored.is_connected());
    }
}
