//! Game statistics recorder.
//!
//! [`GameStats`] is a passive observer of lifecycle transitions: the engine
//! calls `record_*` at game-start, move-dispatch, and result boundaries, and
//! counters are never decremented. Reading is safe at any point, including
//! mid-game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::GameOutcome;

/// Cumulative and current-game statistics for one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStats {
    /// Games with a recorded result
    pub games_played: u64,
    /// Games that ended in a win
    pub games_won: u64,
    /// Games that ended in a loss, timeout, or abandonment
    pub games_lost: u64,
    /// Moves sent across all games
    pub total_moves: u64,
    /// Moves sent in the game currently in progress
    pub current_game_moves: u64,
    /// When the current (or last) game started
    pub started_at: Option<DateTime<Utc>>,
    /// When the last game ended
    pub ended_at: Option<DateTime<Utc>>,
}

impl GameStats {
    /// Record a game-start transition.
    pub fn record_game_started(&mut self) {
        self.current_game_moves = 0;
        self.started_at = Some(Utc::now());
    }

    /// Record one dispatched move.
    pub fn record_move(&mut self) {
        self.current_game_moves += 1;
        self.total_moves += 1;
    }

    /// Record a result transition. Every result counts a played game; the
    /// outcome decides whether it also counts as won or lost.
    pub fn record_result(&mut self, outcome: GameOutcome) {
        self.games_played += 1;
        if outcome == GameOutcome::Win {
            self.games_won += 1;
        } else if outcome.is_loss() {
            self.games_lost += 1;
        }
        self.ended_at = Some(Utc::now());
    }

    /// Fraction of played games that were won, in [0, 1].
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.games_won as f64 / self.games_played as f64
    }

    /// Average moves per played game.
    pub fn avg_moves(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games_played as f64
    }

    /// One-line human-readable summary for launcher output.
    pub fn summary(&self) -> String {
        format!(
            "played={} won={} lost={} win_rate={:.1}% moves={} avg_moves={:.1}",
            self.games_played,
            self.games_won,
            self.games_lost,
            self.win_rate() * 100.0,
            self.total_moves,
            self.avg_moves(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accounting_per_outcome() {
        let mut stats = GameStats::default();
        stats.record_result(GameOutcome::Win);
        stats.record_result(GameOutcome::Loss);
        stats.record_result(GameOutcome::Timeout);
        stats.record_result(GameOutcome::Abandoned);
        stats.record_result(GameOutcome::Error);
        stats.record_result(GameOutcome::Unknown);

        assert_eq!(stats.games_played, 6);
        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.games_lost, 3);
        // error/unknown outcomes count as played only
        assert!(stats.games_won + stats.games_lost <= stats.games_played);
    }

    #[test]
    fn test_game_start_resets_current_game_moves_only() {
        let mut stats = GameStats::default();
        stats.record_game_started();
        stats.record_move();
        stats.record_move();
        stats.record_result(GameOutcome::Win);
        assert_eq!(stats.current_game_moves, 2);

        stats.record_game_started();
        assert_eq!(stats.current_game_moves, 0);
        assert_eq!(stats.total_moves, 2);
        assert_eq!(stats.games_played, 1);
    }

    #[test]
    fn test_rates() {
        let mut stats = GameStats::default();
        assert_eq!(stats.win_rate(), 0.0);
        stats.record_move();
        stats.record_result(GameOutcome::Win);
        stats.record_move();
        stats.record_move();
        stats.record_result(GameOutcome::Loss);
        assert_eq!(stats.win_rate(), 0.5);
        assert_eq!(stats.avg_moves(), 1.5);
        assert!(stats.summary().contains("played=2"));
    }
}
